//! The [hmtx (Horizontal Metrics)](https://docs.microsoft.com/en-us/typography/opentype/spec/hmtx) table

use types::{BigEndian, GlyphId, Tag};

use crate::{FontData, ReadError};

/// 'hmtx'
pub const TAG: Tag = Tag::new(b"hmtx");

/// A record pairing an advance with a side bearing.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C)]
#[repr(packed)]
pub struct LongMetric {
    pub advance: BigEndian<u16>,
    pub side_bearing: BigEndian<i16>,
}

impl LongMetric {
    /// Advance width, in font design units.
    pub fn advance(&self) -> u16 {
        self.advance.get()
    }

    /// Glyph left side bearing, in font design units.
    pub fn side_bearing(&self) -> i16 {
        self.side_bearing.get()
    }
}

/// The [hmtx](https://docs.microsoft.com/en-us/typography/opentype/spec/hmtx)
/// table.
#[derive(Copy, Clone)]
pub struct Hmtx<'a> {
    h_metrics: &'a [LongMetric],
    left_side_bearings: &'a [BigEndian<i16>],
}

impl<'a> Hmtx<'a> {
    /// Read the table, given `numberOfHMetrics` from `hhea` and the glyph
    /// count from `maxp`.
    ///
    /// A trailing side bearing array that is shorter than expected is
    /// truncated to what is available rather than treated as an error.
    pub fn read(
        data: FontData<'a>,
        number_of_h_metrics: u16,
        num_glyphs: u16,
    ) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let h_metrics = cursor.read_array(number_of_h_metrics as usize)?;
        let wanted = num_glyphs.saturating_sub(number_of_h_metrics) as usize;
        let available = cursor.remaining_bytes() / 2;
        let left_side_bearings = cursor.read_array(wanted.min(available))?;
        Ok(Self {
            h_metrics,
            left_side_bearings,
        })
    }

    pub fn h_metrics(&self) -> &'a [LongMetric] {
        self.h_metrics
    }

    pub fn left_side_bearings(&self) -> &'a [BigEndian<i16>] {
        self.left_side_bearings
    }

    /// The advance width for the glyph.
    ///
    /// Glyphs past the end of the long metrics share the advance of the
    /// last entry.
    pub fn advance(&self, glyph_id: GlyphId) -> Option<u16> {
        let ix = (glyph_id.to_u16() as usize).min(self.h_metrics.len().checked_sub(1)?);
        self.h_metrics.get(ix).map(LongMetric::advance)
    }

    /// The left side bearing for the glyph.
    ///
    /// Glyphs past the end of the long metrics read from the trailing side
    /// bearing array, falling back to the side bearing of the last long
    /// metric when that array is too short.
    pub fn side_bearing(&self, glyph_id: GlyphId) -> Option<i16> {
        let ix = glyph_id.to_u16() as usize;
        if let Some(metric) = self.h_metrics.get(ix) {
            return Some(metric.side_bearing());
        }
        self.left_side_bearings
            .get(ix - self.h_metrics.len())
            .map(BigEndian::get)
            .or_else(|| self.h_metrics.last().map(LongMetric::side_bearing))
    }
}
