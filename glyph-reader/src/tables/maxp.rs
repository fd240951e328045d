//! The [maxp (Maximum Profile)](https://docs.microsoft.com/en-us/typography/opentype/spec/maxp) table

use types::Tag;

use crate::{FontData, FontRead, ReadError};

/// 'maxp'
pub const TAG: Tag = Tag::new(b"maxp");

/// The [maxp](https://docs.microsoft.com/en-us/typography/opentype/spec/maxp)
/// table.
///
/// Version 0.5 (used with CFF outlines) only carries the glyph count; the
/// TrueType limits are present in version 1.0.
#[derive(Copy, Clone)]
pub struct Maxp<'a> {
    data: FontData<'a>,
}

impl Maxp<'_> {
    const VERSION_1_0: u32 = 0x00010000;

    /// The table version, 0x00005000 or 0x00010000.
    pub fn version(&self) -> u32 {
        self.data.read_at(0).unwrap_or_default()
    }

    /// The number of glyphs in the font.
    pub fn num_glyphs(&self) -> u16 {
        self.data.read_at(4).unwrap_or_default()
    }

    /// Maximum points in a non-composite glyph.
    pub fn max_points(&self) -> Option<u16> {
        self.v1_field(6)
    }

    /// Maximum contours in a non-composite glyph.
    pub fn max_contours(&self) -> Option<u16> {
        self.v1_field(8)
    }

    /// Maximum levels of recursion; 1 for simple components.
    pub fn max_component_depth(&self) -> Option<u16> {
        self.v1_field(30)
    }

    fn v1_field(&self, offset: usize) -> Option<u16> {
        (self.version() == Self::VERSION_1_0)
            .then(|| self.data.read_at(offset).ok())
            .flatten()
    }
}

impl<'a> FontRead<'a> for Maxp<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let version: u32 = data.read_at(0)?;
        let min_len = if version == Self::VERSION_1_0 { 32 } else { 6 };
        if data.len() < min_len {
            return Err(ReadError::OutOfBounds { offset: data.len() });
        }
        Ok(Self { data })
    }
}
