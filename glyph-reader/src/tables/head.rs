//! The [head (Font Header)](https://docs.microsoft.com/en-us/typography/opentype/spec/head) table

use types::{BoundingBox, Fixed, Tag};

use crate::{FontData, FontRead, ReadError};

/// 'head'
pub const TAG: Tag = Tag::new(b"head");

/// The [head](https://docs.microsoft.com/en-us/typography/opentype/spec/head)
/// (font header) table.
#[derive(Copy, Clone)]
pub struct Head<'a> {
    data: FontData<'a>,
}

impl Head<'_> {
    const MIN_LEN: usize = 54;

    /// Set by font manufacturer.
    pub fn font_revision(&self) -> Fixed {
        self.data.read_at(4).unwrap_or_default()
    }

    pub fn flags(&self) -> u16 {
        self.data.read_at(16).unwrap_or_default()
    }

    /// Set to a value from 16 to 16384. Any value in this range is valid.
    pub fn units_per_em(&self) -> u16 {
        self.data.read_at(18).unwrap_or_default()
    }

    /// The bounding box over all glyphs in the font.
    pub fn bounds(&self) -> BoundingBox<i16> {
        BoundingBox {
            x_min: self.data.read_at(36).unwrap_or_default(),
            y_min: self.data.read_at(38).unwrap_or_default(),
            x_max: self.data.read_at(40).unwrap_or_default(),
            y_max: self.data.read_at(42).unwrap_or_default(),
        }
    }

    /// 0 for short offsets (Offset16), 1 for long (Offset32).
    pub fn index_to_loc_format(&self) -> i16 {
        self.data.read_at(50).unwrap_or_default()
    }
}

impl<'a> FontRead<'a> for Head<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        if data.len() < Self::MIN_LEN {
            return Err(ReadError::OutOfBounds { offset: data.len() });
        }
        Ok(Self { data })
    }
}
