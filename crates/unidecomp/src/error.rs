//! Error types for the table builder.
//!
//! Every error is terminal for a run; there is no partial-success mode.

use thiserror::Error;

/// What was wrong with a `UnicodeData.txt` line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// Fewer than the six fields needed to reach the decomposition column.
    #[error("expected at least 6 fields, found {0}")]
    MissingFields(usize),
    /// Field 0 is not a hexadecimal code point.
    #[error("invalid code point {0:?}")]
    InvalidCodePoint(String),
    /// Field 0 parses but lies beyond U+10FFFF.
    #[error("code point {0:#X} is out of range")]
    CodePointOutOfRange(u32),
    /// A `<tag>` prefix without its closing bracket.
    #[error("unterminated decomposition tag in {0:?}")]
    UnterminatedTag(String),
    /// A `<tag>` prefix with no code points after it.
    #[error("decomposition tag {0:?} has no mapping")]
    EmptyTaggedDecomposition(String),
    /// A decomposition element that is not a hexadecimal code point.
    #[error("invalid decomposition entry {0:?}")]
    InvalidDecomposition(String),
}

/// A malformed database line, with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    /// 1-based line number in the input.
    pub line: usize,
    /// What went wrong.
    pub kind: ParseErrorKind,
}

/// Failure of a full build.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The input could not be read.
    #[error("failed to read character database")]
    Io(#[from] std::io::Error),
    /// The input is not valid `UnicodeData.txt`.
    #[error("malformed character database")]
    Parse(#[from] ParseError),
    /// A decomposition chain loops back on itself.
    #[error("decomposition cycle through U+{code_point:04X}")]
    Cycle {
        /// A code point that is part of the cycle.
        code_point: u32,
    },
}

/// Invalid table contents.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// Pairs are not strictly ascending by composed code point.
    #[error("entry U+{0:04X} is out of order or duplicated")]
    Unsorted(u32),
}

/// A `--format` value that names no known table dialect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown table format {0:?}, expected `c` or `rust`")]
pub struct UnknownFormat(pub String);
