//! Parsing for PostScript INDEX objects.
//!
//! See "5 INDEX Data" at <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5176.CFF.pdf#page=12>

use super::Error;
use crate::{FontData, ReadError};

/// An array of variable sized objects.
///
/// The header is `count: u16`, then (if `count` is nonzero) `offSize: u8`
/// followed by `count + 1` offsets of `offSize` bytes each. Offsets are
/// relative to the byte preceding the object data, so the first offset is
/// always 1.
#[derive(Copy, Clone, Default)]
pub struct Index<'a> {
    count: u16,
    off_size: u8,
    offsets: &'a [u8],
    data: &'a [u8],
}

impl<'a> Index<'a> {
    /// Reads an INDEX from the start of the given data.
    pub fn new(data: &'a [u8]) -> Result<Self, Error> {
        Self::read(FontData::new(data))
    }

    pub fn read(data: FontData<'a>) -> Result<Self, Error> {
        let mut cursor = data.cursor();
        let count: u16 = cursor.read()?;
        if count == 0 {
            return Ok(Self::default());
        }
        let off_size: u8 = cursor.read()?;
        if !(1..=4).contains(&off_size) {
            return Err(Error::InvalidIndexOffsetSize(off_size));
        }
        let offsets = cursor.read_array((count as usize + 1) * off_size as usize)?;
        let data = cursor.remaining().map(|d| d.as_bytes()).unwrap_or_default();
        Ok(Self {
            count,
            off_size,
            offsets,
            data,
        })
    }

    /// Returns the number of objects in the index.
    pub fn count(&self) -> u32 {
        self.count as u32
    }

    /// The size of each offset in bytes. Zero for an empty index.
    pub fn off_size(&self) -> u8 {
        self.off_size
    }

    /// Returns the total size in bytes of the index table.
    ///
    /// This is the distance from the start of the index to the structure
    /// that follows it.
    pub fn size_in_bytes(&self) -> Result<usize, Error> {
        // 2 byte count + 1 byte off_size
        const HEADER_SIZE: usize = 3;
        // An empty CFF index contains only a 2 byte count field
        const EMPTY_SIZE: usize = 2;
        Ok(match self.count as usize {
            0 => EMPTY_SIZE,
            count => HEADER_SIZE + self.offsets.len() + self.get_offset(count)?,
        })
    }

    /// Returns the offset of the object at the given index, relative to the
    /// start of the object data.
    pub fn get_offset(&self, index: usize) -> Result<usize, Error> {
        if index > self.count as usize {
            return Err(ReadError::OutOfBounds {
                offset: index * self.off_size as usize,
            }
            .into());
        }
        let data = FontData::new(self.offsets);
        let pos = index * self.off_size as usize;
        let offset = match self.off_size {
            1 => data.read_at::<u8>(pos)? as usize,
            2 => data.read_at::<u16>(pos)? as usize,
            3 => {
                let hi = data.read_at::<u8>(pos)? as usize;
                let lo = data.read_at::<u16>(pos + 1)? as usize;
                hi << 16 | lo
            }
            4 => data.read_at::<u32>(pos)? as usize,
            other => return Err(Error::InvalidIndexOffsetSize(other)),
        };
        // As above, subtract one to get the actual offset.
        offset.checked_sub(1).ok_or(Error::ZeroOffsetInIndex)
    }

    /// Returns the data for the object at the given index.
    pub fn get(&self, index: usize) -> Result<&'a [u8], Error> {
        let start = self.get_offset(index)?;
        let end = self.get_offset(index + 1)?;
        self.data
            .get(start..end)
            .ok_or_else(|| ReadError::OutOfBounds { offset: start }.into())
    }

    /// Returns an iterator over all objects in the index.
    pub fn iter(&self) -> impl Iterator<Item = Result<&'a [u8], Error>> + 'a {
        let index = *self;
        (0..self.count as usize).map(move |i| index.get(i))
    }
}

/// Computes the subroutine bias for an index with `count` entries.
///
/// Type 1 charstrings do not use a bias.
pub fn subr_bias(count: u32, charstring_type: i32) -> i32 {
    if charstring_type == 1 {
        0
    } else if count < 1240 {
        107
    } else if count < 33900 {
        1131
    } else {
        32768
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyph_test_data::{cff, BeBuffer};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn empty_index() {
        let index = Index::new(&[0, 0, 0xff]).unwrap();
        assert_eq!(index.count(), 0);
        assert_eq!(index.size_in_bytes().unwrap(), 2);
        assert!(index.get(0).is_err());
    }

    #[test]
    fn offset_sizes() {
        for off_size in 1..=4 {
            let objects: Vec<Vec<u8>> = (0..5u8).map(|i| vec![i; i as usize * 3]).collect();
            let bytes = cff::index_with_off_size(&objects, Some(off_size));
            let index = Index::new(&bytes).unwrap();
            assert_eq!(index.off_size(), off_size);
            assert_eq!(index.count(), 5);
            for (i, object) in objects.iter().enumerate() {
                assert_eq!(index.get(i).unwrap(), object.as_slice());
            }
            assert_eq!(index.size_in_bytes().unwrap(), bytes.len());
        }
    }

    #[test]
    fn next_structure_law() {
        // the start of the following structure is
        // 2 + offSize * (count + 1) + lastOffset
        let mut rng = StdRng::seed_from_u64(0x1ce);
        for _ in 0..64 {
            let count = rng.gen_range(1..40);
            let objects: Vec<Vec<u8>> = (0..count)
                .map(|_| {
                    let len = rng.gen_range(0..300);
                    (0..len).map(|_| rng.gen()).collect()
                })
                .collect();
            let bytes = cff::index(&objects);
            let index = Index::new(&bytes).unwrap();
            let last_offset = index.get_offset(count).unwrap() + 1;
            let expected = 2 + index.off_size() as usize * (count + 1) + last_offset;
            assert_eq!(index.size_in_bytes().unwrap(), expected);
            assert_eq!(expected, bytes.len());
            let idx = rng.gen_range(0..count);
            assert_eq!(index.get(idx).unwrap(), objects[idx].as_slice());
        }
    }

    #[test]
    fn bad_offset_size() {
        let bytes = BeBuffer::new().push(1u16).push(5u8).extend([1u8; 12]);
        assert!(matches!(
            Index::new(&bytes),
            Err(Error::InvalidIndexOffsetSize(5))
        ));
    }

    #[test]
    fn zero_offset() {
        let bytes = BeBuffer::new().push(1u16).push(1u8).extend([0u8, 2, 42]);
        let index = Index::new(&bytes).unwrap();
        assert_eq!(index.get(0), Err(Error::ZeroOffsetInIndex));
    }

    #[test]
    fn truncated_object() {
        let bytes = BeBuffer::new()
            .push(2u16)
            .push(1u8)
            .extend([1u8, 3, 10])
            .extend([7u8; 4]);
        let index = Index::new(&bytes).unwrap();
        assert_eq!(index.get(0), Ok(&[7u8, 7][..]));
        assert_eq!(
            index.get(1),
            Err(ReadError::OutOfBounds { offset: 2 }.into())
        );
        assert_eq!(
            index.get(3),
            Err(ReadError::OutOfBounds { offset: 3 }.into())
        );
    }

    #[test]
    fn bias_table() {
        assert_eq!(subr_bias(0, 2), 107);
        assert_eq!(subr_bias(1239, 2), 107);
        assert_eq!(subr_bias(1240, 2), 1131);
        assert_eq!(subr_bias(33899, 2), 1131);
        assert_eq!(subr_bias(33900, 2), 32768);
        assert_eq!(subr_bias(5000, 1), 0);
    }
}
