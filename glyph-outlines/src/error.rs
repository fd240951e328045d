//! The error returned when a glyph cannot be decoded.

use thiserror::Error;

pub use crate::outline::glyf::GlyfError;
pub use raw::{tables::postscript::Error as CffError, ReadError};

/// Errors that may occur when fetching a glyph.
///
/// These are per glyph: a failure is not cached and does not affect any
/// other character.
#[derive(Clone, Debug, Error)]
pub enum FetchError {
    /// Error reading font data.
    #[error(transparent)]
    Read(#[from] ReadError),
    /// Error parsing CFF structures or evaluating a charstring.
    #[error(transparent)]
    Cff(#[from] CffError),
    /// Error assembling a TrueType outline.
    #[error(transparent)]
    Glyf(#[from] GlyfError),
    /// The font has neither a `CFF ` nor a `glyf` table.
    #[error("font has no CFF or glyf outlines")]
    MissingOutlines,
}
