//! test data shared between the glyph outline decoder crates.
//!
//! Rather than checking in binary fonts, the fonts used in tests are
//! assembled from readable big-endian descriptions at test time.

pub mod bebuffer;
pub mod cff;
pub mod cmap;
pub mod sfnt;
pub mod ttf;

pub use bebuffer::BeBuffer;
