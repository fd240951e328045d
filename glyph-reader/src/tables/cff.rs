//! The [CFF](https://learn.microsoft.com/en-us/typography/opentype/spec/cff) table

use types::Tag;

use crate::{FontData, FontRead, ReadError};

/// 'CFF '
pub const TAG: Tag = Tag::new(b"CFF ");

/// The [Compact Font Format](https://adobe-type-tools.github.io/font-tech-notes/pdfs/5176.CFF.pdf) table.
///
/// This only validates the header. The INDEX and DICT structures that follow
/// are parsed by [`postscript::Font`](super::postscript::Font).
#[derive(Copy, Clone)]
pub struct Cff<'a> {
    data: FontData<'a>,
}

impl<'a> Cff<'a> {
    const HEADER_LEN: usize = 4;

    pub fn major(&self) -> u8 {
        self.data.read_at(0).unwrap_or_default()
    }

    pub fn minor(&self) -> u8 {
        self.data.read_at(1).unwrap_or_default()
    }

    /// Size of the header in bytes; the Name INDEX starts here.
    pub fn hdr_size(&self) -> u8 {
        self.data.read_at(2).unwrap_or_default()
    }

    /// Size of the absolute offsets used in the table.
    pub fn off_size(&self) -> u8 {
        self.data.read_at(3).unwrap_or_default()
    }

    /// The entire table, which is the base for all DICT offsets.
    pub fn offset_data(&self) -> FontData<'a> {
        self.data
    }

    /// Data following the header.
    pub fn trailing_data(&self) -> FontData<'a> {
        self.data
            .split_off(self.hdr_size() as usize)
            .unwrap_or_default()
    }
}

impl<'a> FontRead<'a> for Cff<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        if data.len() < Self::HEADER_LEN {
            return Err(ReadError::OutOfBounds { offset: data.len() });
        }
        let cff = Self { data };
        if cff.major() != 1 {
            return Err(ReadError::InvalidFormat(cff.major() as i64));
        }
        if (cff.hdr_size() as usize) < Self::HEADER_LEN || cff.hdr_size() as usize > data.len() {
            return Err(ReadError::MalformedData("CFF header size is out of range"));
        }
        Ok(cff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_header() {
        let data = [1u8, 0, 4, 2, 0, 0];
        let cff = Cff::read(FontData::new(&data)).unwrap();
        assert_eq!((cff.major(), cff.minor()), (1, 0));
        assert_eq!(cff.off_size(), 2);
        assert_eq!(cff.trailing_data().as_bytes(), [0, 0]);
    }

    #[test]
    fn reject_cff2() {
        let data = [2u8, 0, 5, 0, 0];
        assert!(matches!(
            Cff::read(FontData::new(&data)),
            Err(ReadError::InvalidFormat(2))
        ));
        assert!(matches!(
            Cff::read(FontData::new(&[1, 0, 2, 4])),
            Err(ReadError::MalformedData(_))
        ));
    }
}
