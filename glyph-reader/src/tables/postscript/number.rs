//! Operand encoding shared by DICTs and charstrings.
//!
//! See "Table 3 Operand Encoding" at <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5176.CFF.pdf#page=10>

use super::Error;
use crate::Cursor;

/// Longest BCD real we are willing to decode, in characters.
const MAX_REAL_LEN: usize = 64;

/// A DICT operand.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Number {
    Integer(i32),
    Real(f64),
}

impl Number {
    pub fn to_f64(self) -> f64 {
        match self {
            Self::Integer(value) => value as f64,
            Self::Real(value) => value,
        }
    }

    /// Converts the operand to an integer, discarding any fractional part.
    pub fn to_i32(self) -> i32 {
        match self {
            Self::Integer(value) => value,
            Self::Real(value) => value.floor() as i32,
        }
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{value}"),
            Self::Real(value) => write!(f, "{value}"),
        }
    }
}

/// Reads a single DICT operand from the cursor.
pub fn parse_number(cursor: &mut Cursor) -> Result<Number, Error> {
    let b0 = cursor.read::<u8>()?;
    parse_operand(cursor, b0)
}

/// Reads the remainder of an operand that begins with `b0`.
pub(crate) fn parse_operand(cursor: &mut Cursor, b0: u8) -> Result<Number, Error> {
    if b0 == 30 {
        parse_real(cursor).map(Number::Real)
    } else {
        parse_int(cursor, b0).map(Number::Integer)
    }
}

pub(crate) fn parse_int(cursor: &mut Cursor, b0: u8) -> Result<i32, Error> {
    // b0 range     bytes   value
    // 32..=246     1       b0 - 139
    // 247..=250    2       (b0 - 247) * 256 + b1 + 108
    // 251..=254    2       -(b0 - 251) * 256 - b1 - 108
    // 28           3       i16
    // 29           5       i32
    Ok(match b0 {
        32..=246 => b0 as i32 - 139,
        247..=250 => (b0 as i32 - 247) * 256 + cursor.read::<u8>()? as i32 + 108,
        251..=254 => -(b0 as i32 - 251) * 256 - cursor.read::<u8>()? as i32 - 108,
        28 => cursor.read::<i16>()? as i32,
        29 => cursor.read::<i32>()?,
        _ => return Err(Error::InvalidNumber),
    })
}

/// Decodes a packed BCD real, positioned just after the 30 prefix byte.
///
/// Nibbles are expanded to their textual form and the result is parsed as a
/// float. Decoding stops at the first 0xf nibble.
fn parse_real(cursor: &mut Cursor) -> Result<f64, Error> {
    let mut buf = [0u8; MAX_REAL_LEN];
    let mut len = 0;
    let mut push = |bytes: &[u8]| -> Result<(), Error> {
        let end = len + bytes.len();
        buf.get_mut(len..end)
            .ok_or(Error::InvalidNumber)?
            .copy_from_slice(bytes);
        len = end;
        Ok(())
    };
    'outer: loop {
        let byte = cursor.read::<u8>()?;
        for nibble in [byte >> 4, byte & 0xF] {
            match nibble {
                0..=9 => push(&[b'0' + nibble])?,
                0xA => push(b".")?,
                0xB => push(b"E")?,
                0xC => push(b"E-")?,
                0xE => push(b"-")?,
                0xF => break 'outer,
                // 0xD is reserved
                _ => return Err(Error::InvalidNumber),
            }
        }
    }
    std::str::from_utf8(&buf[..len])
        .ok()
        .and_then(|text| text.parse::<f64>().ok())
        .ok_or(Error::InvalidNumber)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FontData;

    fn number(bytes: &[u8]) -> Result<Number, Error> {
        parse_number(&mut FontData::new(bytes).cursor())
    }

    #[test]
    fn integers() {
        assert_eq!(number(&[0x8b]), Ok(Number::Integer(0)));
        assert_eq!(number(&[0xef]), Ok(Number::Integer(100)));
        assert_eq!(number(&[0x27]), Ok(Number::Integer(-100)));
        assert_eq!(number(&[0xfa, 0x7c]), Ok(Number::Integer(1000)));
        assert_eq!(number(&[0xfe, 0x7c]), Ok(Number::Integer(-1000)));
        assert_eq!(number(&[0x1c, 0x27, 0x10]), Ok(Number::Integer(10000)));
        assert_eq!(number(&[0x1c, 0xd8, 0xf0]), Ok(Number::Integer(-10000)));
        assert_eq!(
            number(&[0x1d, 0x00, 0x01, 0x86, 0xa0]),
            Ok(Number::Integer(100000))
        );
        assert_eq!(
            number(&[0x1d, 0xff, 0xfe, 0x79, 0x60]),
            Ok(Number::Integer(-100000))
        );
    }

    #[test]
    fn reals() {
        // examples from "Table 5 Nibble Definitions"
        assert_eq!(number(&[0x1e, 0xe2, 0xa2, 0x5f]), Ok(Number::Real(-2.25)));
        assert_eq!(
            number(&[0x1e, 0x0a, 0x14, 0x05, 0x41, 0xc3, 0xff]),
            Ok(Number::Real(0.140541e-3))
        );
        // terminator in the high nibble
        assert_eq!(number(&[0x1e, 0x1f]), Ok(Number::Real(1.0)));
        assert_eq!(number(&[0x1e, 0x15, 0xf1]), Ok(Number::Real(15.0)));
    }

    #[test]
    fn real_without_digits() {
        assert_eq!(number(&[0x1e, 0xff]), Err(Error::InvalidNumber));
        assert_eq!(number(&[0x1e, 0xef]), Err(Error::InvalidNumber));
    }

    #[test]
    fn unterminated_real() {
        assert!(matches!(
            number(&[0x1e, 0x12, 0x34]),
            Err(Error::Read(crate::ReadError::OutOfBounds { offset: 3 }))
        ));
    }

    #[test]
    fn invalid_prefix() {
        for b0 in [0u8, 21, 27, 31, 255] {
            assert_eq!(number(&[b0, 0, 0, 0, 0]), Err(Error::InvalidNumber));
        }
    }
}
