//! Glyph outline decoding for TrueType and CFF fonts.
//!
//! This crate sits on top of the table readers in [`glyph-reader`](raw) and
//! turns the outline programs of a font into a single representation: an
//! [`Outline`](outline::Outline) made of relative move, line, quadratic and
//! cubic segments, plus the bounds and metrics derived from it.
//!
//! The entry point is [`FontSession`], which resolves characters to glyph
//! indices, decodes the matching outline and caches both results:
//!
//! ```rust,ignore
//! let mut session = FontSession::new(&data, "MyFont", FetchSettings::default())?;
//! let glyph = session.fetch('A')?;
//! ```

#![forbid(unsafe_code)]

/// Expose our "raw" underlying parser crate.
pub extern crate glyph_reader as raw;

pub mod charmap;
pub mod metrics;
pub mod outline;

mod error;
mod glyph;
mod session;
mod settings;

pub use error::FetchError;
pub use glyph::{Flavor, Glyph};
pub use session::FontSession;
pub use settings::FetchSettings;

/// Type for a glyph identifier.
pub type GlyphId = raw::types::GlyphId;
