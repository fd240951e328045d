//! Assembling table data into an sfnt container.

use crate::BeBuffer;
use glyph_types::Tag;
use std::collections::BTreeMap;

/// `sfntVersion` for fonts with TrueType outlines.
pub const TRUETYPE_VERSION: u32 = 0x00010000;
/// `sfntVersion` for fonts with CFF outlines (`OTTO`).
pub const CFF_VERSION: u32 = 0x4F54544F;

/// Collects tables and writes them out with a table directory.
#[derive(Clone, Debug)]
pub struct FontBuilder {
    sfnt_version: u32,
    tables: BTreeMap<Tag, Vec<u8>>,
}

impl FontBuilder {
    pub fn new(sfnt_version: u32) -> Self {
        Self {
            sfnt_version,
            tables: BTreeMap::new(),
        }
    }

    pub fn add_table(&mut self, tag: Tag, data: impl Into<Vec<u8>>) -> &mut Self {
        self.tables.insert(tag, data.into());
        self
    }

    /// Writes the table directory followed by each table, padded to four bytes.
    pub fn build(&self) -> Vec<u8> {
        let num_tables = self.tables.len() as u16;
        let mut buf = BeBuffer::new()
            .push(self.sfnt_version)
            .push(num_tables)
            // searchRange, entrySelector, rangeShift are never consulted
            .extend([0u16; 3]);
        let mut offset = 12 + 16 * self.tables.len();
        for (tag, data) in &self.tables {
            buf = buf
                .push(*tag)
                .push(0u32)
                .push(offset as u32)
                .push(data.len() as u32);
            offset += padded_len(data.len());
        }
        let mut bytes = buf.into_vec();
        for data in self.tables.values() {
            bytes.extend_from_slice(data);
            bytes.resize(padded_len(bytes.len()), 0);
        }
        bytes
    }
}

fn padded_len(len: usize) -> usize {
    (len + 3) & !3
}

/// A `head` table with the given units per em and `indexToLocFormat`.
pub fn head(units_per_em: u16, long_loca: bool) -> Vec<u8> {
    BeBuffer::new()
        .push(0x00010000u32) // version
        .push(0x00010000u32) // fontRevision
        .push(0u32) // checksumAdjustment
        .push(0x5F0F3CF5u32) // magicNumber
        .push(0u16) // flags
        .push(units_per_em)
        .extend([0u32; 4]) // created, modified
        .extend([0i16; 4]) // xMin, yMin, xMax, yMax
        .push(0u16) // macStyle
        .push(8u16) // lowestRecPPEM
        .push(2i16) // fontDirectionHint
        .push(long_loca as i16)
        .push(0i16) // glyphDataFormat
        .into_vec()
}

/// An `hhea` table declaring `number_of_h_metrics` long metrics.
pub fn hhea(number_of_h_metrics: u16) -> Vec<u8> {
    BeBuffer::new()
        .push(0x00010000u32)
        .push(800i16) // ascender
        .push(-200i16) // descender
        .push(0i16) // lineGap
        .push(1000u16) // advanceWidthMax
        .extend([0i16; 3]) // minLeftSideBearing, minRightSideBearing, xMaxExtent
        .extend([1i16, 0, 0]) // caretSlopeRise, caretSlopeRun, caretOffset
        .extend([0i16; 4]) // reserved
        .push(0i16) // metricDataFormat
        .push(number_of_h_metrics)
        .into_vec()
}

/// A `maxp` table; version 0.5 is used for CFF fonts.
pub fn maxp(num_glyphs: u16, truetype: bool) -> Vec<u8> {
    let mut buf = BeBuffer::new()
        .push(if truetype { 0x00010000u32 } else { 0x00005000 })
        .push(num_glyphs);
    if truetype {
        // the remaining version 1.0 fields are unused
        buf = buf.extend([0u16; 13]);
    }
    buf.into_vec()
}

/// An `hmtx` table from (advance, lsb) pairs and trailing bearings.
pub fn hmtx(metrics: &[(u16, i16)], trailing_lsbs: &[i16]) -> Vec<u8> {
    let mut buf = BeBuffer::new();
    for (advance, lsb) in metrics {
        buf = buf.push(*advance).push(*lsb);
    }
    buf.extend(trailing_lsbs.iter().copied()).into_vec()
}
