//! An embedded PostScript "font"

use std::ops::Range;

use super::{
    charstring::{self, CommandSink, EvaluationSummary},
    dict::{FontDict, PrivateDict, TopDict},
    Error, FdSelect, Index, Latin1String, StringId,
};
use crate::{
    tables::cff::Cff,
    types::GlyphId,
    FontData, ReadError, TableProvider,
};

/// Reference to the font embedded in a `CFF ` table.
///
/// Locates the INDEX structures that follow the header and parses the Top
/// DICT of the first font. Only the first font of a FontSet is used, as
/// required for OpenType.
#[derive(Clone)]
pub struct Font<'a> {
    /// Root table data for accessing items by offset.
    table_data: FontData<'a>,
    names: Index<'a>,
    strings: Index<'a>,
    global_subrs: Index<'a>,
    top_dict: TopDict,
    charstrings: Index<'a>,
    fd_array: Option<Index<'a>>,
    fd_select: Option<FdSelect<'a>>,
}

impl<'a> Font<'a> {
    pub fn new(font: &impl TableProvider<'a>) -> Result<Self, Error> {
        Self::from_cff(&font.cff()?)
    }

    pub fn from_cff(cff: &Cff<'a>) -> Result<Self, Error> {
        let table_data = cff.offset_data();
        let mut data = cff.trailing_data();
        let names = Index::read(data)?;
        data = split_off(data, names.size_in_bytes()?)?;
        let top_dicts = Index::read(data)?;
        data = split_off(data, top_dicts.size_in_bytes()?)?;
        let strings = Index::read(data)?;
        data = split_off(data, strings.size_in_bytes()?)?;
        let global_subrs = Index::read(data)?;
        let top_dict = TopDict::new(top_dicts.get(0)?)?;
        let charstrings_offset = top_dict
            .charstrings_offset
            .ok_or(Error::MissingCharstrings)?;
        let charstrings = Index::read(split_off(table_data, charstrings_offset)?)?;
        let (fd_array, fd_select) = if top_dict.is_cid() {
            let fd_array = top_dict
                .fd_array_offset
                .map(|offset| Index::read(split_off(table_data, offset)?))
                .transpose()?;
            let glyph_count = charstrings.count().min(u16::MAX as u32) as u16;
            let fd_select = top_dict
                .fd_select_offset
                .map(|offset| FdSelect::read(split_off(table_data, offset)?, glyph_count))
                .transpose()?;
            (fd_array, fd_select)
        } else {
            (None, None)
        };
        log::debug!(
            "CFF font with {} glyphs, {} global subrs{}",
            charstrings.count(),
            global_subrs.count(),
            if top_dict.is_cid() { ", CID-keyed" } else { "" }
        );
        Ok(Self {
            table_data,
            names,
            strings,
            global_subrs,
            top_dict,
            charstrings,
            fd_array,
            fd_select,
        })
    }

    /// Resolves a string identifier against the standard strings and the
    /// String INDEX.
    pub fn string(&self, id: StringId) -> Option<Latin1String<'a>> {
        match id.standard_string() {
            Ok(name) => Some(name),
            Err(ix) => self.strings.get(ix).ok().map(Latin1String::new),
        }
    }

    /// The PostScript name from the first entry of the Name INDEX.
    pub fn name(&self) -> Option<Latin1String<'a>> {
        self.names.get(0).ok().map(Latin1String::new)
    }

    pub fn top_dict(&self) -> &TopDict {
        &self.top_dict
    }

    pub fn global_subrs(&self) -> Index<'a> {
        self.global_subrs
    }

    pub fn glyph_count(&self) -> u32 {
        self.charstrings.count()
    }

    /// Returns the number of available subfonts.
    pub fn subfont_count(&self) -> u32 {
        self.fd_array
            .as_ref()
            .map(|fd_array| fd_array.count())
            .unwrap_or(1)
    }

    /// Returns the subfont (or FD) index for the given glyph identifier.
    pub fn subfont_index(&self, glyph_id: GlyphId) -> u32 {
        self.fd_select
            .as_ref()
            .and_then(|select| select.font_index(glyph_id))
            // Missing FDSelect assumes a single Font DICT at index 0.
            .unwrap_or(0) as u32
    }

    /// Returns everything needed to evaluate the charstring for the given
    /// glyph.
    pub fn subfont(&self, glyph_id: GlyphId) -> Result<Subfont<'a>, Error> {
        let charstring = self.charstrings.get(glyph_id.to_u16() as usize)?;
        let private_dict_range = self.private_dict_range(glyph_id)?;
        let private_dict = PrivateDict::new(self.table_data, private_dict_range)?;
        let subrs = private_dict
            .subrs_offset
            .map(|offset| Index::read(split_off(self.table_data, offset)?))
            .transpose()?;
        Ok(Subfont {
            charstring,
            global_subrs: self.global_subrs,
            subrs,
            private_dict,
            charstring_type: self.top_dict.charstring_type,
        })
    }

    fn private_dict_range(&self, glyph_id: GlyphId) -> Result<Range<usize>, Error> {
        match &self.fd_array {
            Some(fd_array) => {
                let fd_index = self.subfont_index(glyph_id) as usize;
                let font_dict = FontDict::new(fd_array.get(fd_index)?)?;
                Ok(font_dict.private_dict_range)
            }
            None => self
                .top_dict
                .private_dict_range
                .clone()
                .ok_or(Error::MissingPrivateDict),
        }
    }
}

fn split_off(data: FontData, offset: usize) -> Result<FontData, Error> {
    data.split_off(offset)
        .ok_or_else(|| ReadError::OutOfBounds { offset }.into())
}

/// The charstring of a glyph along with the subroutines and Private DICT
/// that apply to it.
#[derive(Clone)]
pub struct Subfont<'a> {
    pub charstring: &'a [u8],
    pub global_subrs: Index<'a>,
    /// Local subroutines, if the Private DICT has any.
    pub subrs: Option<Index<'a>>,
    pub private_dict: PrivateDict,
    pub charstring_type: i32,
}

impl Subfont<'_> {
    /// Evaluates the charstring, sending path commands to `sink`.
    pub fn evaluate(&self, sink: &mut impl CommandSink) -> Result<EvaluationSummary, Error> {
        charstring::evaluate(
            self.charstring,
            self.charstring_type,
            self.global_subrs,
            self.subrs,
            sink,
        )
    }

    /// The advance width implied by an evaluation.
    ///
    /// A width operand is relative to `nominalWidthX`. Without one the
    /// glyph uses `defaultWidthX`.
    pub fn advance_width(&self, summary: &EvaluationSummary) -> f64 {
        match summary.width {
            Some(delta) => self.private_dict.nominal_width_x + delta.to_f64(),
            None => self.private_dict.default_width_x,
        }
    }
}

impl std::fmt::Debug for Subfont<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subfont")
            .field("charstring_len", &self.charstring.len())
            .field("subrs", &self.subrs.map(|subrs| subrs.count()))
            .field("charstring_type", &self.charstring_type)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{types::Fixed, FontRef};
    use glyph_test_data::cff::{self as test_cff, gids};

    #[derive(Default)]
    struct Points(Vec<(f64, f64)>);

    impl CommandSink for Points {
        fn move_to(&mut self, x: Fixed, y: Fixed) {
            self.0.push((x.to_f64(), y.to_f64()));
        }

        fn line_to(&mut self, x: Fixed, y: Fixed) {
            self.0.push((x.to_f64(), y.to_f64()));
        }

        fn curve_to(&mut self, _: Fixed, _: Fixed, _: Fixed, _: Fixed, x: Fixed, y: Fixed) {
            self.0.push((x.to_f64(), y.to_f64()));
        }

        fn close(&mut self) {}
    }

    #[test]
    fn name_keyed_font() {
        let data = test_cff::cff_font();
        let font = FontRef::new(&data).unwrap();
        let cff = Font::new(&font).unwrap();
        assert_eq!(cff.name().unwrap(), test_cff::FONT_NAME);
        assert_eq!(cff.glyph_count(), 5);
        assert_eq!(cff.subfont_count(), 1);
        assert!(!cff.top_dict().is_cid());
        assert_eq!(cff.global_subrs().count(), 1);
    }

    #[test]
    fn square_width_and_outline() {
        let data = test_cff::cff_font();
        let font = FontRef::new(&data).unwrap();
        let cff = Font::new(&font).unwrap();
        let subfont = cff.subfont(GlyphId::new(gids::SQUARE)).unwrap();
        assert_eq!(subfont.private_dict.blue_values.values(), [-20.0, -20.0, 680.0, 700.0]);
        let mut points = Points::default();
        let summary = subfont.evaluate(&mut points).unwrap();
        assert_eq!(summary.width, Some(Fixed::from_i32(100)));
        assert_eq!(
            subfont.advance_width(&summary),
            (test_cff::NOMINAL_WIDTH + 100) as f64
        );
        assert_eq!(
            points.0,
            [(100.0, 0.0), (600.0, 0.0), (600.0, 700.0), (100.0, 700.0)]
        );
        let notdef = cff.subfont(GlyphId::NOTDEF).unwrap();
        let summary = notdef.evaluate(&mut Points::default()).unwrap();
        assert_eq!(
            notdef.advance_width(&summary),
            test_cff::DEFAULT_WIDTH as f64
        );
    }

    #[test]
    fn local_and_global_subrs() {
        let data = test_cff::cff_font();
        let font = FontRef::new(&data).unwrap();
        let cff = Font::new(&font).unwrap();
        let mut points = Points::default();
        let summary = cff
            .subfont(GlyphId::new(gids::HINTED))
            .unwrap()
            .evaluate(&mut points)
            .unwrap();
        assert_eq!(summary.hstem_count, 1);
        assert_eq!(summary.vstem_count, 2);
        assert_eq!(points.0, [(10.0, 10.0), (210.0, 310.0)]);
        let mut points = Points::default();
        cff.subfont(GlyphId::new(gids::ARCH))
            .unwrap()
            .evaluate(&mut points)
            .unwrap();
        assert_eq!(points.0, [(0.0, 0.0), (400.0, 0.0)]);
    }

    #[test]
    fn cid_keyed_font() {
        let data = test_cff::cid_cff_font();
        let font = FontRef::new(&data).unwrap();
        let cff = Font::new(&font).unwrap();
        let top = cff.top_dict();
        let ros = top.ros.unwrap();
        assert_eq!(cff.string(ros.registry).unwrap(), "Adobe");
        assert_eq!(cff.string(ros.ordering).unwrap(), "Identity");
        assert_eq!(top.cid_count, 3);
        assert_eq!(cff.subfont_count(), 2);
        assert_eq!(cff.subfont_index(GlyphId::new(1)), 0);
        assert_eq!(cff.subfont_index(GlyphId::new(2)), 1);
        let first = cff.subfont(GlyphId::new(1)).unwrap();
        assert!(first.subrs.is_none());
        let summary = first.evaluate(&mut Points::default()).unwrap();
        let (default_width, nominal_width) = test_cff::CID_WIDTHS[0];
        assert_eq!(first.advance_width(&summary), (nominal_width + 50) as f64);
        assert_ne!(default_width, nominal_width + 50);
        let second = cff.subfont(GlyphId::new(2)).unwrap();
        let mut points = Points::default();
        let summary = second.evaluate(&mut points).unwrap();
        assert_eq!(points.0, [(0.0, 0.0), (100.0, 0.0)]);
        assert_eq!(second.advance_width(&summary), test_cff::CID_WIDTHS[1].0 as f64);
    }

    #[test]
    fn glyph_out_of_range() {
        let data = test_cff::cff_font();
        let font = FontRef::new(&data).unwrap();
        let cff = Font::new(&font).unwrap();
        assert!(cff.subfont(GlyphId::new(5)).is_err());
    }
}
