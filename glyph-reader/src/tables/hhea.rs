//! The [hhea (Horizontal Header)](https://docs.microsoft.com/en-us/typography/opentype/spec/hhea) table

use types::Tag;

use crate::{FontData, FontRead, ReadError};

/// 'hhea'
pub const TAG: Tag = Tag::new(b"hhea");

/// The [hhea](https://docs.microsoft.com/en-us/typography/opentype/spec/hhea)
/// horizontal header table.
#[derive(Copy, Clone)]
pub struct Hhea<'a> {
    data: FontData<'a>,
}

impl Hhea<'_> {
    const MIN_LEN: usize = 36;

    /// Typographic ascent.
    pub fn ascender(&self) -> i16 {
        self.data.read_at(4).unwrap_or_default()
    }

    /// Typographic descent.
    pub fn descender(&self) -> i16 {
        self.data.read_at(6).unwrap_or_default()
    }

    /// Typographic line gap.
    pub fn line_gap(&self) -> i16 {
        self.data.read_at(8).unwrap_or_default()
    }

    /// Maximum advance width value in 'hmtx' table.
    pub fn advance_width_max(&self) -> u16 {
        self.data.read_at(10).unwrap_or_default()
    }

    /// Number of LongMetric entries in the 'hmtx' table.
    pub fn number_of_h_metrics(&self) -> u16 {
        self.data.read_at(34).unwrap_or_default()
    }
}

impl<'a> FontRead<'a> for Hhea<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        if data.len() < Self::MIN_LEN {
            return Err(ReadError::OutOfBounds { offset: data.len() });
        }
        Ok(Self { data })
    }
}
