//! Parsing for CFF FDSelect tables.

use types::{BigEndian, GlyphId};

use super::Error;
use crate::FontData;

/// Maps glyph identifiers to Font DICT indices in a CID-keyed font.
///
/// See "19 FDSelect" at <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5176.CFF.pdf#page=28>
#[derive(Copy, Clone, Debug)]
pub enum FdSelect<'a> {
    /// One font index per glyph.
    Format0(&'a [u8]),
    /// Ranges of glyphs sharing a font index, followed by a sentinel glyph
    /// identifier.
    Format3 {
        ranges: &'a [Range3],
        sentinel: u16,
    },
}

/// A format 3 range record.
#[derive(Copy, Clone, Debug, bytemuck::AnyBitPattern)]
#[repr(C)]
#[repr(packed)]
pub struct Range3 {
    first: BigEndian<u16>,
    fd: u8,
}

impl Range3 {
    pub fn first(&self) -> u16 {
        self.first.get()
    }

    pub fn fd(&self) -> u8 {
        self.fd
    }
}

impl<'a> FdSelect<'a> {
    /// Reads an FDSelect structure covering `num_glyphs` glyphs.
    pub fn read(data: FontData<'a>, num_glyphs: u16) -> Result<Self, Error> {
        let mut cursor = data.cursor();
        let format: u8 = cursor.read()?;
        match format {
            0 => Ok(Self::Format0(cursor.read_array(num_glyphs as usize)?)),
            3 => {
                let n_ranges: u16 = cursor.read()?;
                let ranges = cursor.read_array(n_ranges as usize)?;
                let sentinel = cursor.read()?;
                Ok(Self::Format3 { ranges, sentinel })
            }
            other => Err(Error::InvalidFdSelectFormat(other)),
        }
    }

    /// Returns the associated font DICT index for the given glyph identifier.
    pub fn font_index(&self, glyph_id: GlyphId) -> Option<u16> {
        let gid = glyph_id.to_u16();
        match self {
            Self::Format0(fds) => fds.get(gid as usize).map(|fd| *fd as u16),
            Self::Format3 { ranges, sentinel } => {
                if gid >= *sentinel {
                    return None;
                }
                let ix = match ranges.binary_search_by(|range| range.first().cmp(&gid)) {
                    Ok(ix) => ix,
                    Err(ix) => ix.checked_sub(1)?,
                };
                Some(ranges.get(ix)?.fd() as u16)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyph_test_data::BeBuffer;
    use std::ops::Range;

    #[test]
    fn select_font_index() {
        let map = &[
            (0..10, 0),
            (10..32, 4),
            (32..34, 1),
            (34..128, 12),
            (128..1024, 2),
        ];
        for data in make_fd_selects(map) {
            let fd_select = FdSelect::read(FontData::new(&data), 1024).unwrap();
            for (range, font_index) in map {
                for gid in range.clone() {
                    assert_eq!(
                        fd_select.font_index(GlyphId::new(gid)),
                        Some(*font_index as u16)
                    );
                }
            }
        }
    }

    #[test]
    fn format3_past_sentinel() {
        let data = make_fd_selects(&[(0..5, 1)]);
        let fd_select = FdSelect::read(FontData::new(&data[1]), 5).unwrap();
        assert_eq!(fd_select.font_index(GlyphId::new(4)), Some(1));
        assert_eq!(fd_select.font_index(GlyphId::new(5)), None);
    }

    #[test]
    fn unsupported_format() {
        let data = BeBuffer::new().push(4u8).push(0u32);
        assert!(matches!(
            FdSelect::read(FontData::new(&data), 1),
            Err(Error::InvalidFdSelectFormat(4))
        ));
    }

    /// Builds FDSelect structures in both supported formats for the given
    /// Range<GID> -> font index mapping.
    fn make_fd_selects(map: &[(Range<u16>, u8)]) -> [BeBuffer; 2] {
        let glyph_count = map.last().unwrap().0.end;
        let mut fds = vec![0u8; glyph_count as usize];
        for (range, font_index) in map {
            for gid in range.clone() {
                fds[gid as usize] = *font_index;
            }
        }
        let format0 = BeBuffer::new().push(0u8).extend(fds);
        let mut format3 = BeBuffer::new().push(3u8).push(map.len() as u16);
        for (range, font_index) in map {
            format3 = format3.push(range.start).push(*font_index);
        }
        [format0, format3.push(glyph_count)]
    }
}
