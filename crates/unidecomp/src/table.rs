//! `DecompositionTable` — sorted composed → base pairs.
//!
//! This is the in-memory form of the generated `unidecomp_map`. Entries are
//! strictly ascending by composed code point, so lookups are a binary search.

use crate::database::CharacterDatabase;
use crate::error::TableError;

/// One table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableEntry {
    /// The accented (or look-alike) character.
    pub composed: u32,
    /// What it folds to.
    pub base: u32,
    /// Everything the decomposition carried after the base; documentary only.
    pub stripped: Vec<u32>,
}

/// Sorted, duplicate-free lookup table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecompositionTable {
    entries: Vec<TableEntry>,
}

impl DecompositionTable {
    /// Build the table from a filtered database.
    ///
    /// Records with an empty decomposition have no base and are skipped.
    pub fn from_database(db: &CharacterDatabase) -> Self {
        let entries = db
            .iter()
            .filter_map(|(&composed, record)| {
                let Some((&base, stripped)) = record.decomposition.split_first() else {
                    tracing::warn!("U+{:04X} has no decomposition, not emitted", composed);
                    return None;
                };
                Some(TableEntry {
                    composed,
                    base,
                    stripped: stripped.to_vec(),
                })
            })
            .collect();
        // BTreeMap iteration is already ascending and unique
        Self { entries }
    }

    /// Build a table from bare `(composed, base)` pairs.
    ///
    /// # Errors
    ///
    /// [`TableError::Unsorted`] unless the pairs are strictly ascending by
    /// composed code point.
    pub fn from_pairs(pairs: &[(u32, u32)]) -> Result<Self, TableError> {
        let mut entries: Vec<TableEntry> = Vec::with_capacity(pairs.len());
        for &(composed, base) in pairs {
            if entries.last().is_some_and(|last| last.composed >= composed) {
                return Err(TableError::Unsorted(composed));
            }
            entries.push(TableEntry {
                composed,
                base,
                stripped: Vec::new(),
            });
        }
        Ok(Self { entries })
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending composed order.
    pub fn iter(&self) -> std::slice::Iter<'_, TableEntry> {
        self.entries.iter()
    }

    /// `(composed, base)` pairs in ascending composed order.
    pub fn pairs(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.entries.iter().map(|e| (e.composed, e.base))
    }

    /// Base code point for `composed`, if it has an entry.
    pub fn base_of_code_point(&self, composed: u32) -> Option<u32> {
        self.entries
            .binary_search_by_key(&composed, |e| e.composed)
            .ok()
            .and_then(|idx| self.entries.get(idx))
            .map(|e| e.base)
    }

    /// Base character for `c`, if it has an entry.
    pub fn base_of(&self, c: char) -> Option<char> {
        self.base_of_code_point(u32::from(c)).and_then(char::from_u32)
    }

    /// Fold `text` to base characters; characters without an entry are kept.
    pub fn fold(&self, text: &str) -> String {
        text.chars().map(|c| self.base_of(c).unwrap_or(c)).collect()
    }
}

impl<'a> IntoIterator for &'a DecompositionTable {
    type Item = &'a TableEntry;
    type IntoIter = std::slice::Iter<'a, TableEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::database::CharacterRecord;

    fn small_table() -> DecompositionTable {
        DecompositionTable::from_pairs(&[
            (0xC6, 0x41),
            (0xE2, 0x61),
            (0xE8, 0x65),
            (0xE9, 0x65),
            (0xFB, 0x75),
        ])
        .unwrap()
    }

    #[test]
    fn lookup_hits_and_misses() {
        let table = small_table();
        assert_eq!(table.base_of('é'), Some('e'));
        assert_eq!(table.base_of('Æ'), Some('A'));
        assert_eq!(table.base_of('e'), None);
        assert_eq!(table.base_of_code_point(0x10_FFFF), None);
    }

    #[test]
    fn fold_replaces_only_known_characters() {
        assert_eq!(small_table().fold("Crème Brûlée"), "Creme Brulee");
        assert_eq!(small_table().fold("plain ascii"), "plain ascii");
        assert_eq!(small_table().fold(""), "");
    }

    #[test]
    fn from_pairs_rejects_unsorted() {
        assert_eq!(
            DecompositionTable::from_pairs(&[(0xE9, 0x65), (0xC0, 0x41)]),
            Err(TableError::Unsorted(0xC0))
        );
    }

    #[test]
    fn from_pairs_rejects_duplicates() {
        assert_eq!(
            DecompositionTable::from_pairs(&[(0xE9, 0x65), (0xE9, 0x45)]),
            Err(TableError::Unsorted(0xE9))
        );
    }

    #[test]
    fn from_database_takes_first_element_as_base() {
        let db: CharacterDatabase = [
            (0x1EA6, CharacterRecord::with_decomposition("", vec![0x41, 0x302, 0x300])),
            (0xC0, CharacterRecord::with_decomposition("", vec![0x41, 0x300])),
            (0x99, CharacterRecord::new("")),
        ]
        .into_iter()
        .collect();
        let table = DecompositionTable::from_database(&db);
        assert_eq!(table.pairs().collect::<Vec<_>>(), vec![(0xC0, 0x41), (0x1EA6, 0x41)]);
        assert_eq!(table.iter().nth(1).unwrap().stripped, vec![0x302, 0x300]);
    }
}
