//! The [loca (Index to Location)](https://docs.microsoft.com/en-us/typography/opentype/spec/loca) table

use types::{BigEndian, GlyphId, Tag};

use crate::{
    tables::glyf::{Glyf, Glyph},
    FontData, FontRead, ReadError,
};

/// 'loca'
pub const TAG: Tag = Tag::new(b"loca");

/// The [loca] table.
///
/// [loca]: https://docs.microsoft.com/en-us/typography/opentype/spec/loca
#[derive(Clone, Copy)]
pub enum Loca<'a> {
    Short(&'a [BigEndian<u16>]),
    Long(&'a [BigEndian<u32>]),
}

impl<'a> Loca<'a> {
    pub fn read(data: FontData<'a>, is_long: bool) -> Result<Self, ReadError> {
        Ok(if is_long {
            data.read_array(0..data.len() & !3).map(Loca::Long)?
        } else {
            data.read_array(0..data.len() & !1).map(Loca::Short)?
        })
    }

    /// The number of glyphs covered by the table.
    pub fn len(&self) -> usize {
        match self {
            Loca::Short(data) => data.len().saturating_sub(1),
            Loca::Long(data) => data.len().saturating_sub(1),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Attempt to return the offset for a given glyph id.
    ///
    /// Short offsets are stored divided by two.
    pub fn get_raw(&self, idx: usize) -> Option<u32> {
        match self {
            Loca::Short(data) => data.get(idx).map(|x| x.get() as u32 * 2),
            Loca::Long(data) => data.get(idx).map(|x| x.get()),
        }
    }

    fn entry_offset(&self, idx: usize) -> usize {
        match self {
            Loca::Short(_) => idx * 2,
            Loca::Long(_) => idx * 4,
        }
    }

    /// Returns the glyph data for the given id.
    ///
    /// Returns `Ok(None)` when the glyph has no outline, which is signalled
    /// by two equal consecutive offsets.
    pub fn get_glyf(&self, gid: GlyphId, glyf: &Glyf<'a>) -> Result<Option<Glyph<'a>>, ReadError> {
        let idx = gid.to_u16() as usize;
        let start = self.get_raw(idx).ok_or(ReadError::OutOfBounds {
            offset: self.entry_offset(idx),
        })?;
        let end = self.get_raw(idx + 1).ok_or(ReadError::OutOfBounds {
            offset: self.entry_offset(idx + 1),
        })?;
        if start == end {
            return Ok(None);
        }
        let data = glyf
            .offset_data()
            .slice(start as usize..end as usize)
            .ok_or(ReadError::OutOfBounds {
                offset: start as usize,
            })?;
        Glyph::read(data).map(Some)
    }
}
