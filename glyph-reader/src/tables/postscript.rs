//! PostScript (CFF) common structures.
//!
//! This holds the building blocks shared by the `CFF ` table: INDEX
//! navigation, number and DICT decoding, FDSelect and the Type2 charstring
//! interpreter.

use std::fmt;

use crate::ReadError;

pub mod charstring;
pub mod dict;
mod fd_select;
mod font;
mod index;
mod number;
mod stack;
mod string;

pub use fd_select::FdSelect;
pub use font::{Font, Subfont};
pub use index::{subr_bias, Index};
pub use number::{parse_number, Number};
pub use stack::Stack;
pub use string::{Latin1String, StringId, STANDARD_STRING_COUNT};

/// Errors that are specific to PostScript processing.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// The `off_size` field in an INDEX contained an invalid value.
    InvalidIndexOffsetSize(u8),
    /// An INDEX contained a zero offset.
    ZeroOffsetInIndex,
    /// A number began with a byte that does not introduce an operand.
    InvalidNumber,
    InvalidDictOperator(u8),
    InvalidCharstringOperator(u8),
    InvalidFdSelectFormat(u8),
    StackUnderflow,
    InvalidStackAccess(usize),
    InvalidTransientIndex(i32),
    /// A `callsubr` or `callgsubr` referenced a subroutine that does not
    /// exist, after applying the bias.
    InvalidSubroutineIndex(i32),
    /// A `callsubr` was encountered but the Private DICT has no `Subrs`.
    MissingSubroutines,
    MissingPrivateDict,
    MissingCharstrings,
    CharstringNestingDepthLimitExceeded,
    /// Underlying parsing error.
    Read(ReadError),
}

impl From<ReadError> for Error {
    fn from(value: ReadError) -> Self {
        Self::Read(value)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidIndexOffsetSize(size) => {
                write!(f, "invalid offset size of {size} for INDEX (expected 1-4)")
            }
            Self::ZeroOffsetInIndex => {
                write!(f, "invalid offset of 0 in INDEX (must be >= 1)")
            }
            Self::InvalidNumber => write!(f, "number is in an invalid format"),
            Self::InvalidDictOperator(op) => write!(f, "dict operator {op} is invalid"),
            Self::InvalidCharstringOperator(op) => {
                write!(f, "charstring operator {op} is invalid")
            }
            Self::InvalidFdSelectFormat(format) => {
                write!(f, "FDSelect format {format} is not supported")
            }
            Self::StackUnderflow => {
                write!(f, "an operator expected more values than were on the stack")
            }
            Self::InvalidStackAccess(index) => write!(f, "stack access at index {index} is invalid"),
            Self::InvalidTransientIndex(index) => {
                write!(f, "transient array access at index {index} is invalid")
            }
            Self::InvalidSubroutineIndex(index) => {
                write!(f, "biased subroutine index {index} is out of range")
            }
            Self::MissingSubroutines => {
                write!(f, "encountered a callsubr operator but no subroutine index was provided")
            }
            Self::MissingPrivateDict => write!(f, "the font is missing a Private DICT"),
            Self::MissingCharstrings => write!(f, "the font is missing a CharStrings INDEX"),
            Self::CharstringNestingDepthLimitExceeded => {
                write!(
                    f,
                    "exceeded subroutine nesting depth limit {} while evaluating a charstring",
                    charstring::NESTING_DEPTH_LIMIT
                )
            }
            Self::Read(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {}
