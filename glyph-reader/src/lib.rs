//! Reading the font tables needed to decode glyph outlines.
//!
//! This crate provides zero-copy views over the sfnt container and the
//! handful of tables that participate in outline decoding:
//!
//! - the table directory, through [`FontRef`]
//! - `head`, `hhea`, `maxp` and `hmtx` for metrics
//! - `cmap` formats 4 and 12 for character mapping
//! - `loca` and `glyf` for TrueType outlines
//! - `CFF ` along with the PostScript INDEX, DICT and charstring machinery
//!
//! All views borrow from the font data and are cheap to copy. Accessors that
//! read past the end of the data return [`ReadError::OutOfBounds`], carrying
//! the offending offset, rather than panicking.
//!
//! # Example
//!
//! ```no_run
//! use glyph_reader::{FontRef, TableProvider};
//! # let path_to_font = "";
//! let bytes = std::fs::read(path_to_font).unwrap();
//! let font = FontRef::new(&bytes).expect("failed to read font");
//! let upem = font.head().expect("missing head").units_per_em();
//! ```

#![deny(rustdoc::broken_intra_doc_links)]

mod font_data;
mod read;
mod table_provider;

pub mod tables;

pub use font_data::{Cursor, FontData};
pub use read::{FontRead, ReadError};
pub use table_provider::TableProvider;

/// Public re-export of the glyph-types crate.
pub extern crate glyph_types as types;

use types::Tag;

/// Version tag for fonts with TrueType outlines.
pub const TT_SFNT_VERSION: u32 = 0x00010000;
/// Version tag for fonts with CFF outlines (`OTTO`).
pub const CFF_SFNT_VERSION: u32 = 0x4F54544F;
/// Version tag used by some legacy Apple TrueType fonts (`true`).
pub const TRUE_SFNT_VERSION: u32 = 0x74727565;

/// A table record in the font's table directory.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TableRecord {
    pub tag: Tag,
    pub checksum: u32,
    pub offset: u32,
    pub length: u32,
}

/// Reference to an in-memory font.
///
/// This is a simple implementation of the [`TableProvider`] trait backed
/// by a borrowed slice containing font data.
#[derive(Copy, Clone)]
pub struct FontRef<'a> {
    data: FontData<'a>,
    sfnt_version: u32,
    num_tables: u16,
}

impl<'a> FontRef<'a> {
    /// Size of the fixed portion of the table directory.
    const HEADER_LEN: usize = 12;
    /// Size of each table record.
    const RECORD_LEN: usize = 16;

    /// Creates a new reference to an in-memory font backed by the given data.
    ///
    /// The data must be a single font (not a collection) with a supported
    /// `sfntVersion`, and the table records must lie within the data.
    pub fn new(data: &'a [u8]) -> Result<Self, ReadError> {
        let data = FontData::new(data);
        let sfnt_version = data.read_at::<u32>(0)?;
        if ![TT_SFNT_VERSION, CFF_SFNT_VERSION, TRUE_SFNT_VERSION].contains(&sfnt_version) {
            return Err(ReadError::InvalidSfnt(sfnt_version));
        }
        let num_tables = data.read_at::<u16>(4)?;
        let records_end = Self::HEADER_LEN + num_tables as usize * Self::RECORD_LEN;
        if records_end > data.len() {
            return Err(ReadError::OutOfBounds {
                offset: data.len(),
            });
        }
        Ok(Self {
            data,
            sfnt_version,
            num_tables,
        })
    }

    /// The raw `sfntVersion` value.
    pub fn sfnt_version(&self) -> u32 {
        self.sfnt_version
    }

    /// Returns the full font data.
    pub fn data(&self) -> FontData<'a> {
        self.data
    }

    /// Returns an iterator over the records in the table directory.
    pub fn table_records(&self) -> impl Iterator<Item = TableRecord> + 'a {
        let data = self.data;
        (0..self.num_tables as usize).filter_map(move |i| {
            let pos = Self::HEADER_LEN + i * Self::RECORD_LEN;
            Some(TableRecord {
                tag: data.read_at(pos).ok()?,
                checksum: data.read_at(pos + 4).ok()?,
                offset: data.read_at(pos + 8).ok()?,
                length: data.read_at(pos + 12).ok()?,
            })
        })
    }

    /// Returns the data for the table with the specified tag, if present.
    pub fn table_data(&self, tag: Tag) -> Option<FontData<'a>> {
        let record = self.table_records().find(|record| record.tag == tag)?;
        let start = record.offset as usize;
        let end = start.checked_add(record.length as usize)?;
        self.data.slice(start..end)
    }
}

impl<'a> TableProvider<'a> for FontRef<'a> {
    fn data_for_tag(&self, tag: Tag) -> Option<FontData<'a>> {
        self.table_data(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyph_test_data::{sfnt::FontBuilder, BeBuffer};

    #[test]
    fn reads_table_directory() {
        let mut builder = FontBuilder::new(TT_SFNT_VERSION);
        builder
            .add_table(Tag::new(b"abcd"), vec![1, 2, 3])
            .add_table(Tag::new(b"wxyz"), vec![4, 5, 6, 7, 8]);
        let bytes = builder.build();
        let font = FontRef::new(&bytes).unwrap();
        let tags: Vec<_> = font.table_records().map(|rec| rec.tag).collect();
        assert_eq!(tags, [Tag::new(b"abcd"), Tag::new(b"wxyz")]);
        assert_eq!(
            font.table_data(Tag::new(b"wxyz")).unwrap().as_bytes(),
            &[4, 5, 6, 7, 8]
        );
        assert!(font.table_data(Tag::new(b"glyf")).is_none());
    }

    #[test]
    fn rejects_unknown_version() {
        let bytes = BeBuffer::new().push(0x74746366u32).push(0u16);
        assert!(matches!(
            FontRef::new(&bytes),
            Err(ReadError::InvalidSfnt(0x74746366))
        ));
    }

    #[test]
    fn truncated_directory() {
        let bytes = BeBuffer::new()
            .push(CFF_SFNT_VERSION)
            .push(3u16)
            .extend([0u16; 3]);
        assert_eq!(
            FontRef::new(&bytes).err(),
            Some(ReadError::OutOfBounds { offset: 12 })
        );
    }
}
