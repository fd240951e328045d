//! Mapping of characters to nominal glyph identifiers.
//!
//! ## Selection strategy
//!
//! Two subtables are selected from the [cmap](https://learn.microsoft.com/en-us/typography/opentype/spec/cmap)
//! table:
//!
//! * a Basic Multilingual Plane mapping: format 4 from the Windows Unicode
//!   BMP encoding (3, 1) or any Unicode platform encoding from 0 to 3;
//! * a full repertoire mapping: format 12 from the Windows Unicode full
//!   encoding (3, 10) or the Unicode platform encodings 4 and 6.
//!
//! The BMP subtable is consulted first. The full repertoire subtable is only
//! consulted when the BMP subtable does not resolve the character.
//!
//! Glyph 0 is `.notdef` and a mapping to it is treated as absent.

use raw::{
    tables::cmap::{platform, Cmap12, Cmap4, CmapSubtable, EncodingRecord},
    types::GlyphId,
    FontData, TableProvider,
};

/// Mapping of characters to nominal glyph identifiers.
#[derive(Clone, Default)]
pub struct Charmap<'a> {
    bmp: Option<Cmap4<'a>>,
    full: Option<Cmap12<'a>>,
}

impl<'a> Charmap<'a> {
    /// Creates a new character map from the given font.
    ///
    /// A font without a usable `cmap` table yields an empty map.
    pub fn new(font: &impl TableProvider<'a>) -> Self {
        let Ok(cmap) = font.cmap() else {
            log::debug!("font has no readable cmap table");
            return Default::default();
        };
        let data = cmap.offset_data();
        let mut charmap = Self::default();
        for record in cmap.encoding_records() {
            let Some(subtable) = read_subtable(record, data) else {
                continue;
            };
            match subtable {
                CmapSubtable::Format4(cmap4) if is_bmp_encoding(record) => {
                    charmap.bmp.get_or_insert(cmap4);
                }
                CmapSubtable::Format12(cmap12) if is_full_encoding(record) => {
                    charmap.full.get_or_insert(cmap12);
                }
                CmapSubtable::Format4(_) | CmapSubtable::Format12(_) => {}
                CmapSubtable::Other(format) => log::warn!(
                    "cmap subtable format {format} for encoding ({}, {}) is not supported",
                    record.platform_id(),
                    record.encoding_id()
                ),
            }
        }
        charmap
    }

    /// Returns true if any supported subtable was found.
    pub fn has_map(&self) -> bool {
        self.bmp.is_some() || self.full.is_some()
    }

    /// Maps a character to a nominal glyph identifier.
    ///
    /// Returns `None` if a mapping does not exist or resolves to `.notdef`.
    pub fn map(&self, ch: impl Into<u32>) -> Option<GlyphId> {
        let ch = ch.into();
        self.bmp
            .as_ref()
            .and_then(|cmap4| cmap4.map_codepoint(ch))
            .filter(|gid| !gid.is_notdef())
            .or_else(|| {
                self.full
                    .as_ref()
                    .and_then(|cmap12| cmap12.map_codepoint(ch))
                    .filter(|gid| !gid.is_notdef())
            })
    }
}

fn read_subtable<'a>(record: &EncodingRecord, data: FontData<'a>) -> Option<CmapSubtable<'a>> {
    match record.subtable(data) {
        Ok(subtable) => Some(subtable),
        Err(e) => {
            log::debug!(
                "skipping unreadable cmap subtable ({}, {}): {e}",
                record.platform_id(),
                record.encoding_id()
            );
            None
        }
    }
}

fn is_bmp_encoding(record: &EncodingRecord) -> bool {
    match record.platform_id() {
        platform::WINDOWS => record.encoding_id() == 1,
        platform::UNICODE => record.encoding_id() <= 3,
        _ => false,
    }
}

fn is_full_encoding(record: &EncodingRecord) -> bool {
    match record.platform_id() {
        platform::WINDOWS => record.encoding_id() == 10,
        platform::UNICODE => matches!(record.encoding_id(), 4 | 6),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyph_test_data::{
        cmap::{self, Segment4},
        sfnt::{FontBuilder, TRUETYPE_VERSION},
        ttf::{self, gids},
    };
    use raw::{types::Tag, FontRef};

    fn font_with_cmap(cmap: Vec<u8>) -> Vec<u8> {
        let mut builder = FontBuilder::new(TRUETYPE_VERSION);
        builder.add_table(Tag::new(b"cmap"), cmap);
        builder.build()
    }

    #[test]
    fn bmp_then_full_repertoire() {
        let data = ttf::simple_font(false);
        let font = FontRef::new(&data).unwrap();
        let charmap = Charmap::new(&font);
        assert!(charmap.has_map());
        assert_eq!(charmap.map('A'), Some(GlyphId::new(gids::SQUARE)));
        assert_eq!(charmap.map('C'), Some(GlyphId::new(gids::COMPOSITE)));
        assert_eq!(charmap.map('a'), Some(GlyphId::new(gids::SQUARE)));
        assert_eq!(charmap.map('c'), Some(GlyphId::new(gids::ARCH)));
        // Zero in the glyph id array and no format 12 mapping
        assert_eq!(charmap.map('b'), None);
        // Only present in the format 12 subtable
        assert_eq!(charmap.map('😀'), Some(GlyphId::new(gids::ARCH)));
        assert_eq!(charmap.map('Z'), None);
    }

    #[test]
    fn uppercase_segment() {
        let cmap4 = cmap::format4(&[Segment4::delta(65, 90, 0)]);
        let data = font_with_cmap(cmap::cmap(&[(3, 1, cmap4)]));
        let font = FontRef::new(&data).unwrap();
        let charmap = Charmap::new(&font);
        assert_eq!(charmap.map(65u32), Some(GlyphId::new(65)));
        assert_eq!(charmap.map(90u32), Some(GlyphId::new(90)));
        assert_eq!(charmap.map(64u32), None);
    }

    #[test]
    fn notdef_is_not_found() {
        let cmap4 = cmap::format4(&[Segment4::delta(0x41, 0x41, -0x41)]);
        let data = font_with_cmap(cmap::cmap(&[(0, 3, cmap4)]));
        let font = FontRef::new(&data).unwrap();
        assert_eq!(Charmap::new(&font).map('A'), None);
    }

    #[test]
    fn ignores_unsupported_encodings_and_formats() {
        let cmap4 = cmap::format4(&[Segment4::delta(0x41, 0x41, 1)]);
        let cmap12 = cmap::format12(&[(0x41, 0x41, 7)]);
        // A symbol encoding and a format 12 table in a BMP encoding record
        let data = font_with_cmap(cmap::cmap(&[(3, 0, cmap4), (3, 1, cmap12)]));
        let font = FontRef::new(&data).unwrap();
        let charmap = Charmap::new(&font);
        assert!(!charmap.has_map());
        assert_eq!(charmap.map('A'), None);
    }

    #[test]
    fn missing_cmap() {
        let data = FontBuilder::new(TRUETYPE_VERSION).build();
        let font = FontRef::new(&data).unwrap();
        assert!(!Charmap::new(&font).has_map());
    }
}
