//! TableBuilder — the fixed parse → augment → expand → filter pipeline.
//!
//! Passes always run in this order; the database is owned by the builder run
//! and handed back read-only together with the finished table.

use std::io::BufRead;

use crate::database::CharacterDatabase;
use crate::error::BuildError;
use crate::special::{augment, SpecialMapping, SPECIAL_DECOMPOSITIONS};
use crate::table::DecompositionTable;
use crate::{expand, filter};

/// Record counts after each pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Records read from the input.
    pub parsed: usize,
    /// Records forced in by the special mapping.
    pub forced: usize,
    /// Decompositions replaced by their flattened form.
    pub expanded: usize,
    /// Records removed by the filter.
    pub filtered_out: usize,
    /// Rows in the final table.
    pub retained: usize,
}

/// Output of a successful run.
#[derive(Debug, Clone)]
pub struct BuiltTable {
    /// The database after filtering.
    pub database: CharacterDatabase,
    /// Sorted composed → base rows.
    pub table: DecompositionTable,
    /// Per-pass counts.
    pub stats: BuildStats,
}

/// Runs the build passes with a given special mapping.
#[derive(Debug, Clone, Copy)]
pub struct TableBuilder<'m> {
    special: &'m SpecialMapping,
}

impl Default for TableBuilder<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl TableBuilder<'static> {
    /// Builder using [`SPECIAL_DECOMPOSITIONS`].
    pub const fn new() -> Self {
        Self {
            special: SPECIAL_DECOMPOSITIONS,
        }
    }
}

impl<'m> TableBuilder<'m> {
    /// Builder with a custom special mapping.
    pub const fn with_special(special: &'m SpecialMapping) -> Self {
        Self { special }
    }

    /// Parse `UnicodeData.txt` from `reader` and build the table.
    ///
    /// # Errors
    ///
    /// [`BuildError::Io`], [`BuildError::Parse`] or [`BuildError::Cycle`].
    pub fn build_from_reader<R: BufRead>(&self, reader: R) -> Result<BuiltTable, BuildError> {
        let db = CharacterDatabase::parse(reader)?;
        self.build(db)
    }

    /// Build from `UnicodeData.txt` content held in memory.
    ///
    /// # Errors
    ///
    /// [`BuildError::Parse`] or [`BuildError::Cycle`].
    pub fn build_from_str(&self, text: &str) -> Result<BuiltTable, BuildError> {
        let db = CharacterDatabase::parse_str(text)?;
        self.build(db)
    }

    /// Run augment → expand → filter over an already parsed database.
    ///
    /// # Errors
    ///
    /// [`BuildError::Cycle`] if a decomposition chain loops.
    pub fn build(&self, mut db: CharacterDatabase) -> Result<BuiltTable, BuildError> {
        let parsed = db.len();
        tracing::info!(records = parsed, "parsed character database");

        let forced = augment(&mut db, self.special);
        tracing::debug!(forced = forced.len(), "applied special decompositions");

        let expanded = expand::expand(&mut db)?;
        tracing::info!(expanded, "expanded decompositions");

        let filtered_out = filter::filter(&mut db, &forced);
        let table = DecompositionTable::from_database(&db);
        tracing::info!(retained = table.len(), filtered_out, "built decomposition table");

        let stats = BuildStats {
            parsed,
            forced: forced.len(),
            expanded,
            filtered_out,
            retained: table.len(),
        };

        Ok(BuiltTable {
            database: db,
            table,
            stats,
        })
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::arithmetic_side_effects
)]
mod tests {
    use super::*;

    const UNIDATA: &str = "\
0020;SPACE;Zs;0;WS;;;;;N;;;;;
0041;LATIN CAPITAL LETTER A;Lu;0;L;;;;;N;;;;0061;
0061;LATIN SMALL LETTER A;Ll;0;L;;;;;N;;;0041;;0041
00B4;ACUTE ACCENT;Sk;0;ON;<compat> 0020 0301;;;;N;SPACING ACUTE;;;;
00C0;LATIN CAPITAL LETTER A WITH GRAVE;Lu;0;L;0041 0300;;;;N;LATIN CAPITAL LETTER A GRAVE;;;00E0;
00C2;LATIN CAPITAL LETTER A WITH CIRCUMFLEX;Lu;0;L;0041 0302;;;;N;LATIN CAPITAL LETTER A CIRCUMFLEX;;;00E2;
00C6;LATIN CAPITAL LETTER AE;Lu;0;L;;;;;N;LATIN CAPITAL LETTER A E;;;00E6;
0300;COMBINING GRAVE ACCENT;Mn;230;NSM;;;;;N;NON-SPACING GRAVE;;;;
0302;COMBINING CIRCUMFLEX ACCENT;Mn;230;NSM;;;;;N;NON-SPACING CIRCUMFLEX;;;;
1EA6;LATIN CAPITAL LETTER A WITH CIRCUMFLEX AND GRAVE;Lu;0;L;00C2 0300;;;;N;;;;1EA7;
";

    #[test]
    fn builds_table_with_builtin_specials() {
        let built = TableBuilder::new().build_from_str(UNIDATA).unwrap();
        // À, Â, Ầ plus every look-alike (Æ among them)
        assert_eq!(built.table.len(), SPECIAL_DECOMPOSITIONS.len() + 3);
        for (composed, base) in [(0xC0, 0x41), (0xC2, 0x41), (0x1EA6, 0x41), (0xC6, 0x41), (0x2026, 0x2E)] {
            assert_eq!(built.table.base_of_code_point(composed), Some(base));
        }
        assert_eq!(built.table.base_of_code_point(0xB4), None);
        assert_eq!(built.table.base_of_code_point(0x41), None);
    }

    #[test]
    fn stats_count_each_pass() {
        let built = TableBuilder::with_special(&[('Æ', 'A')]).build_from_str(UNIDATA).unwrap();
        assert_eq!(
            built.stats,
            BuildStats {
                parsed: 10,
                forced: 1,
                expanded: 5,
                filtered_out: 6,
                retained: 4,
            }
        );
    }

    #[test]
    fn reader_and_str_agree() {
        let a = TableBuilder::new().build_from_str(UNIDATA).unwrap();
        let b = TableBuilder::new().build_from_reader(UNIDATA.as_bytes()).unwrap();
        assert_eq!(a.table, b.table);
    }

    #[test]
    fn parse_error_aborts_build() {
        let text = format!("{UNIDATA}XYZ;BROKEN;Lu;0;L;;;;;N;;;;;\n");
        match TableBuilder::new().build_from_str(&text) {
            Err(BuildError::Parse(e)) => assert_eq!(e.line, 11),
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
