//! Character to glyph fetching with per font caches.

use std::sync::Arc;

use fnv::FnvHashMap;
use raw::{types::GlyphId, FontRef, TableProvider};
use serde_json::Value;

use crate::{
    charmap::Charmap,
    error::FetchError,
    glyph::{Flavor, Glyph},
    metrics::GlyphMetrics,
    outline::{cff, glyf, Outline},
    settings::FetchSettings,
};

#[derive(Clone)]
enum OutlineSource<'a> {
    Cff(cff::Outlines<'a>),
    Glyf(glyf::Outlines<'a>),
}

/// Decodes glyphs from a single font and caches the results.
///
/// Both the character to glyph index mapping and the decoded glyphs are
/// cached per character. Characters that cannot be mapped, or whose glyph is
/// filtered out, are cached as absent. Decoding errors are not cached.
pub struct FontSession<'a> {
    name: String,
    settings: FetchSettings,
    charmap: Charmap<'a>,
    metrics: GlyphMetrics<'a>,
    source: OutlineSource<'a>,
    index_cache: FnvHashMap<char, Option<GlyphId>>,
    glyph_cache: FnvHashMap<char, Option<Arc<Glyph>>>,
}

impl<'a> FontSession<'a> {
    /// Opens a session on the given font data.
    ///
    /// CFF outlines are preferred when a font carries both kinds.
    pub fn new(data: &'a [u8], name: &str, settings: FetchSettings) -> Result<Self, FetchError> {
        let font = FontRef::new(data)?;
        Self::from_font(&font, name, settings)
    }

    /// Opens a session on an already parsed font.
    pub fn from_font(
        font: &FontRef<'a>,
        name: &str,
        settings: FetchSettings,
    ) -> Result<Self, FetchError> {
        let source = if font.data_for_tag(raw::tables::cff::TAG).is_some() {
            OutlineSource::Cff(cff::Outlines::new(font)?)
        } else if font.data_for_tag(raw::tables::glyf::TAG).is_some() {
            OutlineSource::Glyf(
                glyf::Outlines::new(font)?.with_depth_limit(settings.composite_depth_limit),
            )
        } else {
            return Err(FetchError::MissingOutlines);
        };
        let charmap = Charmap::new(font);
        if !charmap.has_map() {
            log::warn!("font {name} has no supported character map");
        }
        Ok(Self {
            name: name.to_owned(),
            settings,
            charmap,
            metrics: GlyphMetrics::new(font),
            source,
            index_cache: Default::default(),
            glyph_cache: Default::default(),
        })
    }

    /// The name the session was opened with.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn flavor(&self) -> Flavor {
        match self.source {
            OutlineSource::Cff(_) => Flavor::Cff,
            OutlineSource::Glyf(_) => Flavor::TrueType,
        }
    }

    pub fn units_per_em(&self) -> u16 {
        self.metrics.units_per_em()
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    /// Returns the glyph index for a character, if the font maps it.
    pub fn glyph_id(&mut self, ch: char) -> Option<GlyphId> {
        let charmap = &self.charmap;
        *self
            .index_cache
            .entry(ch)
            .or_insert_with(|| charmap.map(ch))
    }

    /// Returns true if the font maps the character to a glyph.
    pub fn supports(&mut self, ch: char) -> bool {
        self.glyph_id(ch).is_some()
    }

    /// Fetches the glyph for a character.
    ///
    /// Returns `Ok(None)` when the font does not map the character, when the
    /// glyph is a tiny single contour TrueType glyph or when its outline
    /// hash matches the configured filler hash.
    pub fn fetch(&mut self, ch: char) -> Result<Option<Arc<Glyph>>, FetchError> {
        let Some(glyph_id) = self.glyph_id(ch) else {
            return Ok(None);
        };
        if let Some(cached) = self.glyph_cache.get(&ch) {
            return Ok(cached.clone());
        }
        log::debug!("glyph cache miss for {ch:?} (glyph {glyph_id})");
        let glyph = self.load(ch, glyph_id)?.map(Arc::new);
        self.glyph_cache.insert(ch, glyph.clone());
        Ok(glyph)
    }

    /// Fetches the glyph for a character as a JSON object.
    pub fn fetch_json(&mut self, ch: char) -> Result<Option<Value>, FetchError> {
        Ok(self.fetch(ch)?.map(|glyph| glyph.to_json()))
    }

    fn load(&self, ch: char, glyph_id: GlyphId) -> Result<Option<Glyph>, FetchError> {
        let glyph = match &self.source {
            OutlineSource::Cff(outlines) => {
                let cff_glyph = outlines.glyph(glyph_id)?;
                self.make_glyph(
                    ch,
                    glyph_id,
                    Flavor::Cff,
                    cff_glyph.outline,
                    cff_glyph.advance_width,
                    None,
                )
            }
            OutlineSource::Glyf(outlines) => {
                if let Some(threshold) = self.settings.tiny_glyph_threshold {
                    if outlines.is_tiny(glyph_id, threshold)? {
                        log::debug!("glyph {glyph_id} for {ch:?} is below {threshold} units");
                        return Ok(None);
                    }
                }
                let outline = outlines.outline(glyph_id)?;
                let advance_width = self.metrics.advance_width(glyph_id).unwrap_or_default();
                let lsb = self.metrics.left_side_bearing(glyph_id);
                self.make_glyph(
                    ch,
                    glyph_id,
                    Flavor::TrueType,
                    outline,
                    advance_width as f64,
                    lsb.map(f64::from),
                )
            }
        };
        if self.settings.filler_hash == Some(glyph.hash) {
            log::debug!("glyph {glyph_id} for {ch:?} is a filler glyph");
            return Ok(None);
        }
        Ok(Some(glyph))
    }

    fn make_glyph(
        &self,
        ch: char,
        glyph_id: GlyphId,
        flavor: Flavor,
        outline: Outline,
        advance_width: f64,
        lsb: Option<f64>,
    ) -> Glyph {
        Glyph::new(
            &self.name,
            ch,
            glyph_id,
            flavor,
            self.units_per_em(),
            outline,
            advance_width,
            lsb,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{glyph::outline_hash, metrics::Metrics, outline::glyf::GlyfError};
    use glyph_test_data::{
        cff,
        sfnt::{FontBuilder, TRUETYPE_VERSION},
        ttf::{self, gids},
    };
    use pretty_assertions::assert_eq;
    use raw::types::{BoundingBox, Tag};

    #[test]
    fn truetype_square() {
        let data = ttf::simple_font(false);
        let mut session = FontSession::new(&data, "Simple", FetchSettings::default()).unwrap();
        assert_eq!(session.flavor(), Flavor::TrueType);
        assert_eq!(session.units_per_em(), ttf::UNITS_PER_EM);
        let glyph = session.fetch('A').unwrap().unwrap();
        assert_eq!(glyph.glyph_id, GlyphId::new(gids::SQUARE));
        assert_eq!(glyph.flavor, Flavor::TrueType);
        assert_eq!(
            glyph.metrics,
            Metrics {
                lsb: 100.0,
                rsb: 100.0,
                width: 700.0,
                height: 700.0
            }
        );
        assert_eq!(
            glyph.bounds,
            BoundingBox {
                x_min: 100,
                y_min: 0,
                x_max: 600,
                y_max: 700
            }
        );
        assert_eq!(glyph.outline.to_compact_string(), "m100 0l500 0l0 700l-500 0");
    }

    #[test]
    fn long_loca_matches_short() {
        let short = ttf::simple_font(false);
        let long = ttf::simple_font(true);
        let mut short = FontSession::new(&short, "Simple", FetchSettings::default()).unwrap();
        let mut long = FontSession::new(&long, "Simple", FetchSettings::default()).unwrap();
        for ch in ['A', 'B', 'C', ' '] {
            assert_eq!(short.fetch(ch).unwrap(), long.fetch(ch).unwrap());
        }
    }

    #[test]
    fn results_are_cached() {
        let data = ttf::simple_font(false);
        let mut session = FontSession::new(&data, "Simple", FetchSettings::default()).unwrap();
        let first = session.fetch('B').unwrap().unwrap();
        let second = session.fetch('B').unwrap().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        // Distinct characters mapping to the same glyph are cached separately
        let lower = session.fetch('c').unwrap().unwrap();
        assert!(!Arc::ptr_eq(&first, &lower));
        assert_eq!(first.outline, lower.outline);
    }

    #[test]
    fn unsupported_characters() {
        let data = ttf::simple_font(false);
        let mut session = FontSession::new(&data, "Simple", FetchSettings::default()).unwrap();
        assert!(!session.supports('Z'));
        assert_eq!(session.fetch('Z').unwrap(), None);
        // Glyph id array entry of zero
        assert!(!session.supports('b'));
        assert_eq!(session.fetch('b').unwrap(), None);
        assert!(session.supports('😀'));
    }

    #[test]
    fn tiny_glyph_filter() {
        let data = ttf::simple_font(false);
        let mut session = FontSession::new(&data, "Simple", FetchSettings::default()).unwrap();
        assert!(session.supports('.'));
        assert_eq!(session.fetch('.').unwrap(), None);
        let settings = FetchSettings::default().with_tiny_glyph_threshold(None);
        let mut session = FontSession::new(&data, "Simple", settings).unwrap();
        let dot = session.fetch('.').unwrap().unwrap();
        assert_eq!(dot.metrics.width, 1200.0);
        assert_eq!(dot.bounds.width(), 50);
    }

    #[test]
    fn empty_glyph() {
        let data = ttf::simple_font(false);
        let mut session = FontSession::new(&data, "Simple", FetchSettings::default()).unwrap();
        let space = session.fetch(' ').unwrap().unwrap();
        assert!(space.outline.is_empty());
        assert_eq!(space.bounds, BoundingBox::default());
        assert_eq!(
            space.metrics,
            Metrics {
                lsb: 0.0,
                rsb: 1200.0,
                width: 1200.0,
                height: 0.0
            }
        );
    }

    #[test]
    fn filler_hash() {
        let data = ttf::simple_font(false);
        let square = outline_hash("m100 0l500 0l0 700l-500 0");
        let settings = FetchSettings::default().with_filler_hash(Some(square));
        let mut session = FontSession::new(&data, "Simple", settings).unwrap();
        assert_eq!(session.fetch('A').unwrap(), None);
        assert!(session.fetch('B').unwrap().is_some());
    }

    #[test]
    fn errors_are_per_glyph() {
        let _ = env_logger::builder().is_test(true).try_init();
        let data = ttf::simple_font(false);
        let mut session = FontSession::new(&data, "Simple", FetchSettings::default()).unwrap();
        let err = session.fetch('E').unwrap_err();
        assert!(matches!(
            err,
            FetchError::Glyf(GlyfError::PointMatchingUnsupported(_))
        ));
        // Not cached, so the same error is reported again
        assert!(session.fetch('E').is_err());
        assert!(matches!(
            session.fetch('F').unwrap_err(),
            FetchError::Glyf(GlyfError::RecursionLimitExceeded { .. })
        ));
        assert!(session.fetch('A').unwrap().is_some());
    }

    #[test]
    fn composite_metrics() {
        let data = ttf::simple_font(false);
        let mut session = FontSession::new(&data, "Simple", FetchSettings::default()).unwrap();
        let glyph = session.fetch('C').unwrap().unwrap();
        assert_eq!(
            glyph.bounds,
            BoundingBox {
                x_min: 100,
                y_min: 0,
                x_max: 900,
                y_max: 700
            }
        );
        assert_eq!(glyph.metrics.width, 1200.0);
        assert_eq!(glyph.metrics.lsb, 100.0);
        assert_eq!(glyph.metrics.rsb, 300.0);
    }

    #[test]
    fn cff_glyphs() {
        let data = cff::cff_font();
        let mut session = FontSession::new(&data, "TestCFF", FetchSettings::default()).unwrap();
        assert_eq!(session.flavor(), Flavor::Cff);
        let glyph = session.fetch('A').unwrap().unwrap();
        assert_eq!(glyph.flavor, Flavor::Cff);
        assert_eq!(glyph.metrics.width, 700.0);
        assert_eq!(glyph.metrics.lsb, 100.0);
        assert_eq!(glyph.metrics.rsb, 100.0);
        // Tiny glyph filtering only applies to TrueType outlines
        assert!(session.fetch('B').unwrap().is_some());
    }

    #[test]
    fn cid_keyed_cff() {
        let data = cff::cid_cff_font();
        let mut session = FontSession::new(&data, "TestCID", FetchSettings::default()).unwrap();
        let glyph = session.fetch('A').unwrap().unwrap();
        assert_eq!(glyph.metrics.width, 350.0);
    }

    #[test]
    fn json_output() {
        let data = ttf::simple_font(false);
        let mut session = FontSession::new(&data, "Simple", FetchSettings::default()).unwrap();
        let json = session.fetch_json('A').unwrap().unwrap();
        let keys = json
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>();
        let mut expected = vec![
            "glyph", "font", "type", "index", "quadsize", "lsb", "rsb", "width", "height", "minx",
            "maxx", "miny", "maxy", "outline",
        ];
        expected.sort_unstable();
        assert_eq!(keys, expected);
        assert_eq!(json["type"], "TTF");
        assert_eq!(json["font"], "Simple");
        assert_eq!(json["index"], 1);
        assert_eq!(json["rsb"], 100);
        assert_eq!(session.fetch_json('Z').unwrap(), None);
    }

    #[test]
    fn missing_outlines() {
        let mut builder = FontBuilder::new(TRUETYPE_VERSION);
        builder.add_table(Tag::new(b"head"), glyph_test_data::sfnt::head(1000, false));
        let data = builder.build();
        assert!(matches!(
            FontSession::new(&data, "Empty", FetchSettings::default()),
            Err(FetchError::MissingOutlines)
        ));
    }
}
