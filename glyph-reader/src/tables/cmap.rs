//! The [cmap](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap) table

use types::{BigEndian, GlyphId, Tag};

use crate::{FontData, FontRead, ReadError};

/// 'cmap'
pub const TAG: Tag = Tag::new(b"cmap");

/// Platform identifiers used in encoding records.
pub mod platform {
    pub const UNICODE: u16 = 0;
    pub const MACINTOSH: u16 = 1;
    pub const WINDOWS: u16 = 3;
}

/// [cmap](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#overview)
#[derive(Copy, Clone)]
pub struct Cmap<'a> {
    data: FontData<'a>,
    encoding_records: &'a [EncodingRecord],
}

impl<'a> Cmap<'a> {
    /// Table version number (0).
    pub fn version(&self) -> u16 {
        self.data.read_at(0).unwrap_or_default()
    }

    pub fn encoding_records(&self) -> &'a [EncodingRecord] {
        self.encoding_records
    }

    /// The data that encoding record offsets are relative to.
    pub fn offset_data(&self) -> FontData<'a> {
        self.data
    }

    /// Map a codepoint to a nominal glyph identifier
    ///
    /// This uses the first available subtable that provides a valid mapping.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        let codepoint = codepoint.into();
        self.encoding_records
            .iter()
            .filter_map(|record| record.subtable(self.data).ok())
            .find_map(|subtable| subtable.map_codepoint(codepoint))
    }
}

impl<'a> FontRead<'a> for Cmap<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let _version: u16 = cursor.read()?;
        let num_tables: u16 = cursor.read()?;
        let encoding_records = cursor.read_array(num_tables as usize)?;
        Ok(Self {
            data,
            encoding_records,
        })
    }
}

/// [Encoding Record](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#encoding-records-and-encodings)
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C)]
#[repr(packed)]
pub struct EncodingRecord {
    pub platform_id: BigEndian<u16>,
    pub encoding_id: BigEndian<u16>,
    pub subtable_offset: BigEndian<u32>,
}

impl EncodingRecord {
    pub fn platform_id(&self) -> u16 {
        self.platform_id.get()
    }

    pub fn encoding_id(&self) -> u16 {
        self.encoding_id.get()
    }

    /// Byte offset from beginning of the cmap table to the subtable.
    pub fn subtable_offset(&self) -> u32 {
        self.subtable_offset.get()
    }

    /// Resolve the subtable, given the data of the parent `cmap` table.
    pub fn subtable<'a>(&self, data: FontData<'a>) -> Result<CmapSubtable<'a>, ReadError> {
        let offset = self.subtable_offset() as usize;
        data.split_off(offset)
            .ok_or(ReadError::OutOfBounds { offset })
            .and_then(CmapSubtable::read)
    }
}

/// The subtable formats we know how to map with.
#[derive(Clone, Copy)]
pub enum CmapSubtable<'a> {
    Format4(Cmap4<'a>),
    Format12(Cmap12<'a>),
    /// Any other format, which is recognized but not mapped.
    Other(u16),
}

impl CmapSubtable<'_> {
    pub fn format(&self) -> u16 {
        match self {
            Self::Format4(_) => 4,
            Self::Format12(_) => 12,
            Self::Other(format) => *format,
        }
    }

    /// Maps a codepoint to a nominal glyph identifier.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        match self {
            Self::Format4(subtable) => subtable.map_codepoint(codepoint),
            Self::Format12(subtable) => subtable.map_codepoint(codepoint),
            Self::Other(_) => None,
        }
    }
}

impl<'a> FontRead<'a> for CmapSubtable<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let format: u16 = data.read_at(0)?;
        match format {
            4 => Cmap4::read(data).map(Self::Format4),
            12 => Cmap12::read(data).map(Self::Format12),
            other => Ok(Self::Other(other)),
        }
    }
}

/// [cmap Format 4](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-4-segment-mapping-to-delta-values):
/// Segment mapping to delta values
#[derive(Clone, Copy)]
pub struct Cmap4<'a> {
    data: FontData<'a>,
    end_code: &'a [BigEndian<u16>],
    start_code: &'a [BigEndian<u16>],
    id_delta: &'a [BigEndian<i16>],
    id_range_offsets: &'a [BigEndian<u16>],
}

impl<'a> Cmap4<'a> {
    const END_CODE_OFFSET: usize = 14;

    pub fn seg_count_x2(&self) -> u16 {
        (self.end_code.len() * 2) as u16
    }

    /// End characterCode for each segment, last=0xFFFF.
    pub fn end_code(&self) -> &'a [BigEndian<u16>] {
        self.end_code
    }

    /// Start character code for each segment.
    pub fn start_code(&self) -> &'a [BigEndian<u16>] {
        self.start_code
    }

    /// Delta for all character codes in segment.
    pub fn id_delta(&self) -> &'a [BigEndian<i16>] {
        self.id_delta
    }

    /// Offsets into glyphIdArray or 0
    pub fn id_range_offsets(&self) -> &'a [BigEndian<u16>] {
        self.id_range_offsets
    }

    /// Maps a codepoint to a nominal glyph identifier.
    ///
    /// Selects the first segment whose end code is at least the codepoint;
    /// the codepoint is mapped only if it also lies after the start code.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        let codepoint = u16::try_from(codepoint.into()).ok()?;
        let index = self
            .end_code
            .partition_point(|end| end.get() < codepoint);
        let start_code = self.start_code.get(index)?.get();
        if codepoint < start_code {
            return None;
        }
        self.lookup_glyph_id(codepoint, index, start_code)
    }

    /// Does the final phase of glyph id lookup.
    ///
    /// The range offset is relative to the location of the offset itself,
    /// so the glyph id is read from the subtable data directly.
    fn lookup_glyph_id(&self, codepoint: u16, index: usize, start_code: u16) -> Option<GlyphId> {
        let delta = self.id_delta.get(index)?.get();
        let range_offset = self.id_range_offsets.get(index)?.get() as usize;
        if range_offset == 0 {
            return Some(GlyphId::new(codepoint.wrapping_add_signed(delta)));
        }
        let range_offset_pos = self.id_range_offsets_start() + index * 2;
        let pos = range_offset_pos + range_offset + 2 * (codepoint - start_code) as usize;
        let gid: u16 = self.data.read_at(pos).ok()?;
        (gid != 0).then(|| GlyphId::new(gid.wrapping_add_signed(delta)))
    }

    fn id_range_offsets_start(&self) -> usize {
        Self::END_CODE_OFFSET + self.end_code.len() * 6 + 2
    }
}

impl<'a> FontRead<'a> for Cmap4<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        cursor.advance_by(6); // format, length, language
        let seg_count = cursor.read::<u16>()? as usize / 2;
        cursor.advance_by(6); // searchRange, entrySelector, rangeShift
        let end_code = cursor.read_array(seg_count)?;
        cursor.advance_by(2); // reservedPad
        let start_code = cursor.read_array(seg_count)?;
        let id_delta = cursor.read_array(seg_count)?;
        let id_range_offsets = cursor.read_array(seg_count)?;
        Ok(Self {
            data,
            end_code,
            start_code,
            id_delta,
            id_range_offsets,
        })
    }
}

/// A sequential map group, used by format 12.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C)]
#[repr(packed)]
pub struct SequentialMapGroup {
    pub start_char_code: BigEndian<u32>,
    pub end_char_code: BigEndian<u32>,
    pub start_glyph_id: BigEndian<u32>,
}

impl SequentialMapGroup {
    /// First character code in this group.
    pub fn start_char_code(&self) -> u32 {
        self.start_char_code.get()
    }

    /// Last character code in this group.
    pub fn end_char_code(&self) -> u32 {
        self.end_char_code.get()
    }

    /// Glyph index corresponding to the starting character code.
    pub fn start_glyph_id(&self) -> u32 {
        self.start_glyph_id.get()
    }
}

/// [cmap Format 12](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-12-segmented-coverage):
/// Segmented coverage
#[derive(Clone, Copy)]
pub struct Cmap12<'a> {
    groups: &'a [SequentialMapGroup],
}

impl<'a> Cmap12<'a> {
    pub fn groups(&self) -> &'a [SequentialMapGroup] {
        self.groups
    }

    /// Maps a codepoint to a nominal glyph identifier.
    ///
    /// Groups are sorted by start code, so the scan stops at the first group
    /// that starts after the codepoint.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        let codepoint = codepoint.into();
        for group in self.groups {
            if group.start_char_code() > codepoint {
                return None;
            }
            if codepoint <= group.end_char_code() {
                let gid = group
                    .start_glyph_id()
                    .checked_add(codepoint - group.start_char_code())?;
                return u16::try_from(gid).ok().map(GlyphId::new);
            }
        }
        None
    }
}

impl<'a> FontRead<'a> for Cmap12<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        cursor.advance_by(12); // format, reserved, length, language
        let num_groups: u32 = cursor.read()?;
        let groups = cursor.read_array(num_groups as usize)?;
        Ok(Self { groups })
    }
}
