//! Loading outlines from the `CFF ` table.

use raw::{
    tables::postscript::{
        charstring::{CommandSink, EvaluationSummary},
        Error, Font, Latin1String,
    },
    types::{Fixed, GlyphId},
    TableProvider,
};

use super::{Outline, OutlineBuilder, OutlinePen};

/// Outline loader for a font with a `CFF ` table.
#[derive(Clone)]
pub struct Outlines<'a> {
    font: Font<'a>,
}

impl<'a> Outlines<'a> {
    pub fn new(font: &impl TableProvider<'a>) -> Result<Self, Error> {
        Ok(Self {
            font: Font::new(font)?,
        })
    }

    /// The PostScript name of the embedded font.
    pub fn name(&self) -> Option<Latin1String<'a>> {
        self.font.name()
    }

    pub fn is_cid(&self) -> bool {
        self.font.top_dict().is_cid()
    }

    pub fn glyph_count(&self) -> u32 {
        self.font.glyph_count()
    }

    /// Evaluates the charstring for the given glyph.
    pub fn glyph(&self, glyph_id: GlyphId) -> Result<CffGlyph, Error> {
        let subfont = self.font.subfont(glyph_id)?;
        let mut builder = OutlineBuilder::new();
        let summary = subfont.evaluate(&mut PenSink(&mut builder))?;
        let advance_width = subfont.advance_width(&summary);
        log::debug!(
            "evaluated charstring for glyph {glyph_id}: width {advance_width}, {} hstems, {} vstems",
            summary.hstem_count,
            summary.vstem_count
        );
        Ok(CffGlyph {
            outline: builder.finish(),
            advance_width,
            summary,
        })
    }
}

/// The result of evaluating a charstring.
#[derive(Clone, Debug)]
pub struct CffGlyph {
    pub outline: Outline,
    /// `nominalWidthX` plus the charstring width, or `defaultWidthX`.
    pub advance_width: f64,
    pub summary: EvaluationSummary,
}

/// Command sink that sends the results of charstring evaluation to
/// an [OutlinePen].
struct PenSink<'a, P>(&'a mut P);

impl<P> CommandSink for PenSink<'_, P>
where
    P: OutlinePen,
{
    fn move_to(&mut self, x: Fixed, y: Fixed) {
        self.0.move_to(x.to_f64(), y.to_f64());
    }

    fn line_to(&mut self, x: Fixed, y: Fixed) {
        self.0.line_to(x.to_f64(), y.to_f64());
    }

    fn curve_to(&mut self, cx0: Fixed, cy0: Fixed, cx1: Fixed, cy1: Fixed, x: Fixed, y: Fixed) {
        self.0.curve_to(
            cx0.to_f64(),
            cy0.to_f64(),
            cx1.to_f64(),
            cy1.to_f64(),
            x.to_f64(),
            y.to_f64(),
        );
    }

    fn close(&mut self) {
        self.0.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::GlyphRule;
    use glyph_test_data::cff::{self as test_cff, gids};
    use raw::FontRef;

    #[test]
    fn square_outline_and_width() {
        let data = test_cff::cff_font();
        let font = FontRef::new(&data).unwrap();
        let outlines = Outlines::new(&font).unwrap();
        assert_eq!(outlines.name().unwrap(), test_cff::FONT_NAME);
        assert!(!outlines.is_cid());
        let glyph = outlines.glyph(GlyphId::new(gids::SQUARE)).unwrap();
        assert_eq!(glyph.advance_width, 700.0);
        assert_eq!(glyph.outline.to_compact_string(), "m100 0l500 0l0 700l-500 0");
    }

    #[test]
    fn gsubr_arch_is_a_cubic() {
        let data = test_cff::cff_font();
        let font = FontRef::new(&data).unwrap();
        let outlines = Outlines::new(&font).unwrap();
        let glyph = outlines.glyph(GlyphId::new(gids::ARCH)).unwrap();
        assert_eq!(
            glyph.outline.rules(),
            [
                GlyphRule::MoveTo { dx: 0.0, dy: 0.0 },
                GlyphRule::CubicTo {
                    c1dx: 0.0,
                    c1dy: 400.0,
                    c2dx: 400.0,
                    c2dy: 0.0,
                    dx: 0.0,
                    dy: -400.0
                }
            ]
        );
        assert_eq!(glyph.advance_width, test_cff::DEFAULT_WIDTH as f64);
        let bounds = glyph.outline.bounds();
        assert_eq!((bounds.x_min, bounds.x_max, bounds.y_max), (0, 400, 300));
    }

    #[test]
    fn flex_emits_two_curves() {
        let data = test_cff::cff_font();
        let font = FontRef::new(&data).unwrap();
        let outlines = Outlines::new(&font).unwrap();
        let glyph = outlines.glyph(GlyphId::new(gids::FLEX)).unwrap();
        let curves = glyph
            .outline
            .rules()
            .iter()
            .filter(|rule| matches!(rule, GlyphRule::CubicTo { .. }))
            .count();
        assert_eq!(curves, 2);
        assert_eq!(
            glyph.outline.to_absolute_svg(0.0, 0.0),
            "M 0 0 C 100 50 200 50 300 0 C 400 -50 500 -50 600 0 "
        );
    }

    #[test]
    fn cid_font_selects_private_dict() {
        let data = test_cff::cid_cff_font();
        let font = FontRef::new(&data).unwrap();
        let outlines = Outlines::new(&font).unwrap();
        assert!(outlines.is_cid());
        assert_eq!(outlines.glyph_count(), 3);
        let first = outlines.glyph(GlyphId::new(1)).unwrap();
        assert_eq!(first.advance_width, 350.0);
        assert_eq!(first.summary.width, Some(Fixed::from_i32(50)));
        let second = outlines.glyph(GlyphId::new(2)).unwrap();
        assert_eq!(second.advance_width, 900.0);
        assert_eq!(second.outline.to_compact_string(), "m0 0l100 0");
    }
}
