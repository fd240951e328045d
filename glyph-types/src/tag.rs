use std::{
    fmt::{Debug, Display, Formatter},
    str::FromStr,
};

/// A four byte table tag, such as `glyf` or `CFF `.
///
/// Tags read from a font are never validated; fonts in the wild carry all
/// sorts of junk in their table directories and we still want to be able to
/// name those tables.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "bytemuck", derive(bytemuck_derive::AnyBitPattern))]
#[repr(transparent)]
pub struct Tag([u8; 4]);

impl Tag {
    /// Construct a `Tag` from raw bytes, without validation.
    pub const fn new(src: &[u8; 4]) -> Tag {
        Tag(*src)
    }

    /// Attempt to create a `Tag` from between one and four printable ascii bytes.
    ///
    /// Short input is padded with spaces.
    pub fn new_checked(src: &[u8]) -> Result<Self, InvalidTag> {
        if src.is_empty() || src.len() > 4 {
            return Err(InvalidTag::InvalidLength(src.len()));
        }
        let mut raw = [b' '; 4];
        for (pos, (slot, byte)) in raw.iter_mut().zip(src.iter().copied()).enumerate() {
            if !(0x20..=0x7e).contains(&byte) || (pos == 0 && byte == b' ') {
                return Err(InvalidTag::InvalidByte { pos, byte });
            }
            *slot = byte;
        }
        Ok(Tag(raw))
    }

    /// Create a tag from raw big-endian bytes.
    pub const fn from_be_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Return the memory representation of this tag.
    pub const fn to_be_bytes(self) -> [u8; 4] {
        self.0
    }
}

/// An error representing an invalid tag.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvalidTag {
    /// The tag was not between 1 and 4 bytes in length.
    InvalidLength(usize),
    /// The tag contained a byte outside of the printable ascii range.
    InvalidByte { pos: usize, byte: u8 },
}

impl std::error::Error for InvalidTag {}

impl Display for InvalidTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidTag::InvalidByte { pos, byte } => {
                write!(f, "Invalid byte 0x{byte:X} at index {pos}")
            }
            InvalidTag::InvalidLength(len) => write!(f, "Invalid length ({len})"),
        }
    }
}

impl FromStr for Tag {
    type Err = InvalidTag;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        Tag::new_checked(src.as_bytes())
    }
}

impl crate::raw::Scalar for Tag {
    type Raw = [u8; 4];

    fn to_raw(self) -> Self::Raw {
        self.0
    }

    fn from_raw(raw: Self::Raw) -> Self {
        Self(raw)
    }
}

impl crate::raw::FixedSize for Tag {
    const RAW_BYTE_LEN: usize = 4;
}

impl PartialEq<[u8; 4]> for Tag {
    fn eq(&self, other: &[u8; 4]) -> bool {
        &self.0 == other
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for byte in self.0 {
            if (0x20..=0x7E).contains(&byte) {
                write!(f, "{}", byte as char)?;
            } else {
                write!(f, "{{0x{byte:02X}}}")?;
            }
        }
        Ok(())
    }
}

impl Debug for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tag({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_and_rejected() {
        assert_eq!(Tag::new_checked(b"CFF").unwrap(), Tag::new(b"CFF "));
        assert_eq!(
            Tag::new_checked(b" abc"),
            Err(InvalidTag::InvalidByte { pos: 0, byte: b' ' })
        );
        assert_eq!(Tag::new_checked(b"toolong"), Err(InvalidTag::InvalidLength(7)));
    }

    #[test]
    fn display_escapes_unprintable() {
        let tag = Tag::from_be_bytes([b'g', 0, b'y', b'f']);
        assert_eq!(tag.to_string(), "g{0x00}yf");
        assert_eq!("loca".parse::<Tag>().unwrap(), Tag::new(b"loca"));
    }
}
