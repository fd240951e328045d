//! Decoded glyphs.

use std::{fmt, hash::Hasher};

use fnv::FnvHasher;
use raw::types::{BoundingBox, GlyphId};
use serde_json::{json, Value};

use crate::{metrics::Metrics, outline::Outline};

/// The kind of outline a font carries.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Flavor {
    /// Type 2 charstrings in a `CFF ` table.
    Cff,
    /// Quadratic contours in a `glyf` table.
    TrueType,
}

impl Flavor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cff => "CFF",
            Self::TrueType => "TTF",
        }
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded glyph with its outline and metrics.
#[derive(Clone, PartialEq, Debug)]
pub struct Glyph {
    /// Name of the font the glyph was read from.
    pub font: String,
    pub character: char,
    pub glyph_id: GlyphId,
    pub flavor: Flavor,
    pub units_per_em: u16,
    pub outline: Outline,
    pub bounds: BoundingBox<i32>,
    pub metrics: Metrics,
    /// FNV-1a hash of the compact outline string.
    pub hash: u64,
}

impl Glyph {
    /// Assembles a glyph from its outline.
    ///
    /// Without an explicit left side bearing the left edge of the outline
    /// is used.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        font: &str,
        character: char,
        glyph_id: GlyphId,
        flavor: Flavor,
        units_per_em: u16,
        outline: Outline,
        advance_width: f64,
        lsb: Option<f64>,
    ) -> Self {
        let bounds = outline.bounds();
        let lsb = lsb.unwrap_or(bounds.x_min as f64);
        let hash = outline_hash(&outline.to_compact_string());
        Self {
            font: font.to_owned(),
            character,
            glyph_id,
            flavor,
            units_per_em,
            outline,
            bounds,
            metrics: Metrics::new(advance_width, lsb, &bounds),
            hash,
        }
    }

    /// Returns the glyph as a JSON object.
    pub fn to_json(&self) -> Value {
        json!({
            "glyph": self.character.to_string(),
            "font": self.font,
            "type": self.flavor.as_str(),
            "index": self.glyph_id.to_u16(),
            "quadsize": self.units_per_em,
            "lsb": number(self.metrics.lsb),
            "rsb": number(self.metrics.rsb),
            "width": number(self.metrics.width),
            "height": number(self.metrics.height),
            "minx": self.bounds.x_min,
            "maxx": self.bounds.x_max,
            "miny": self.bounds.y_min,
            "maxy": self.bounds.y_max,
            "outline": self.outline.to_compact_string(),
        })
    }
}

/// Hashes a compact outline string with 64-bit FNV-1a.
pub fn outline_hash(compact: &str) -> u64 {
    let mut hasher = FnvHasher::default();
    hasher.write(compact.as_bytes());
    hasher.finish()
}

/// Integral values are written as JSON integers.
fn number(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        json!(value as i64)
    } else {
        json!(value)
    }
}
