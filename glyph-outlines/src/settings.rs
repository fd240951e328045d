use crate::outline::glyf::COMPOSITE_RECURSION_LIMIT;

/// Default size below which a single contour TrueType glyph is ignored.
pub const TINY_GLYPH_THRESHOLD: u16 = 120;

/// Options that control how glyphs are fetched.
///
/// ```
/// use glyph_outlines::FetchSettings;
///
/// let settings = FetchSettings::new()
///     .with_filler_hash(Some(0x1234))
///     .with_tiny_glyph_threshold(None);
/// assert_eq!(settings.composite_depth_limit, 64);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct FetchSettings {
    /// Outline hash of a placeholder glyph. Glyphs with this hash are
    /// reported as missing.
    pub filler_hash: Option<u64>,
    /// A requested TrueType glyph with a single contour whose header bounding
    /// box is smaller than this in both directions is reported as missing.
    ///
    /// This is a heuristic for spotting placeholder marks and it only looks
    /// at the header of the requested glyph. Composite glyphs always pass,
    /// even when every component would be tiny on its own, and CFF glyphs
    /// are never filtered.
    pub tiny_glyph_threshold: Option<u16>,
    /// Maximum nesting of composite glyphs.
    pub composite_depth_limit: usize,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            filler_hash: None,
            tiny_glyph_threshold: Some(TINY_GLYPH_THRESHOLD),
            composite_depth_limit: COMPOSITE_RECURSION_LIMIT,
        }
    }
}

impl FetchSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filler_hash(self, filler_hash: Option<u64>) -> Self {
        Self {
            filler_hash,
            ..self
        }
    }

    pub fn with_tiny_glyph_threshold(self, tiny_glyph_threshold: Option<u16>) -> Self {
        Self {
            tiny_glyph_threshold,
            ..self
        }
    }

    pub fn with_composite_depth_limit(self, composite_depth_limit: usize) -> Self {
        Self {
            composite_depth_limit,
            ..self
        }
    }
}
