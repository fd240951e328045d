//! Common scalar data types used when decoding glyph outlines
//!
//! These types are shared between the table readers in `glyph-reader` and
//! the outline assembly in `glyph-outlines`. Most of them are thin wrappers
//! over big-endian bytes, with methods for converting to native values.

#![deny(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

mod bbox;
mod fixed;
mod glyph_id;
mod point;
mod raw;
mod tag;


pub use bbox::BoundingBox;
pub use fixed::{F2Dot14, Fixed};
pub use glyph_id::GlyphId;
pub use point::Point;
pub use raw::{BigEndian, FixedSize, Scalar};
pub use tag::{InvalidTag, Tag};
