//! Glyph specific metrics.
//!
//! Horizontal metrics come from the [hmtx](https://learn.microsoft.com/en-us/typography/opentype/spec/hmtx)
//! table for TrueType outlines. CFF outlines carry their own advance widths
//! and use the left edge of the outline as the side bearing.

use raw::{
    tables::hmtx::Hmtx,
    types::{BoundingBox, GlyphId},
    TableProvider,
};

/// Glyph specific metrics read from the `head` and `hmtx` tables.
#[derive(Clone)]
pub struct GlyphMetrics<'a> {
    units_per_em: u16,
    hmtx: Option<Hmtx<'a>>,
}

impl<'a> GlyphMetrics<'a> {
    /// Creates new glyph metrics from the given font.
    ///
    /// Missing tables are not an error here: the units per em fall back to
    /// 1000 and lookups return `None`.
    pub fn new(font: &impl TableProvider<'a>) -> Self {
        let units_per_em = font
            .head()
            .map(|head| head.units_per_em())
            .unwrap_or(1000);
        let hmtx = match font.hmtx() {
            Ok(hmtx) => Some(hmtx),
            Err(e) => {
                log::debug!("no horizontal metrics: {e}");
                None
            }
        };
        Self { units_per_em, hmtx }
    }

    /// Returns the number of font design units per em unit.
    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    /// Returns the advance width for the specified glyph.
    ///
    /// Glyphs past the last long metric share its advance.
    pub fn advance_width(&self, glyph_id: GlyphId) -> Option<u16> {
        self.hmtx.as_ref()?.advance(glyph_id)
    }

    /// Returns the left side bearing for the specified glyph.
    pub fn left_side_bearing(&self, glyph_id: GlyphId) -> Option<i16> {
        self.hmtx.as_ref()?.side_bearing(glyph_id)
    }
}

/// Horizontal and vertical extents of a decoded glyph.
#[derive(Copy, Clone, PartialEq, Default, Debug)]
pub struct Metrics {
    /// Left side bearing.
    pub lsb: f64,
    /// Right side bearing: `width - (lsb + bounds width)`.
    pub rsb: f64,
    /// Advance width.
    pub width: f64,
    /// Height of the bounding box.
    pub height: f64,
}

impl Metrics {
    /// Derives the side bearings and height from an advance, a left side
    /// bearing and the outline bounds.
    pub fn new(width: f64, lsb: f64, bounds: &BoundingBox<i32>) -> Self {
        Self {
            lsb,
            rsb: width - (lsb + bounds.width() as f64),
            width,
            height: bounds.height() as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyph_test_data::ttf::{self, gids};
    use raw::FontRef;

    #[test]
    fn hmtx_lookups() {
        let data = ttf::simple_font(false);
        let font = FontRef::new(&data).unwrap();
        let metrics = GlyphMetrics::new(&font);
        assert_eq!(metrics.units_per_em(), ttf::UNITS_PER_EM);
        assert_eq!(metrics.advance_width(GlyphId::new(gids::SQUARE)), Some(700));
        assert_eq!(metrics.left_side_bearing(GlyphId::new(gids::SQUARE)), Some(100));
        // Past the long metrics: shared advance, trailing bearing
        assert_eq!(metrics.advance_width(GlyphId::new(gids::DOT)), Some(1200));
        assert_eq!(metrics.left_side_bearing(GlyphId::new(gids::DOT)), Some(0));
        // Past the trailing bearings: last long metric's bearing
        assert_eq!(
            metrics.left_side_bearing(GlyphId::new(gids::SELF_REFERENCE)),
            Some(100)
        );
    }

    #[test]
    fn derived_metrics() {
        let bounds = BoundingBox {
            x_min: 100,
            y_min: -10,
            x_max: 600,
            y_max: 700,
        };
        let metrics = Metrics::new(700.0, 100.0, &bounds);
        assert_eq!(
            metrics,
            Metrics {
                lsb: 100.0,
                rsb: 100.0,
                width: 700.0,
                height: 710.0
            }
        );
    }
}
