//! Unicode decomposition table builder — composed letter → base letter map.
//!
//! Turns `UnicodeData.txt` into the static table the player uses to strip
//! diacritics when matching and sorting track metadata.
//!
//! # Modules
//!
//! - [`database`] — `UnicodeData.txt` parser, `CharacterRecord` / `CharacterDatabase`
//! - [`special`] — built-in look-alike mappings and the augmentation pass
//! - [`expand`] — recursive flattening of decompositions
//! - [`filter`] — keep only letter + combining mark(s) entries
//! - [`table`] — sorted `(composed, base)` pairs, lookup and folding
//! - [`emit`] — C / Rust source rendering of the table
//! - [`builder`] — the fixed parse → augment → expand → filter pipeline

#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::expect_used)]

pub mod builder;
pub mod database;
pub mod emit;
pub mod error;
pub mod expand;
pub mod filter;
pub mod special;
pub mod table;

// Top-level re-exports for convenience
pub use builder::{BuildStats, BuiltTable, TableBuilder};
pub use database::{CharacterDatabase, CharacterRecord};
pub use emit::{write_table, TableFormat};
pub use error::{BuildError, ParseError, ParseErrorKind, TableError, UnknownFormat};
pub use filter::is_diacritical_mark;
pub use special::{SpecialMapping, SPECIAL_DECOMPOSITIONS};
pub use table::DecompositionTable;
