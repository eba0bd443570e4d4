//! Look-alike mappings for characters the UCD does not decompose.
//!
//! Some letters have no decomposition but can't be typed on every keyboard,
//! and typographic punctuation should match its ASCII form. Each entry maps
//! such a character to an ASCII character that *looks* similar.

use std::collections::BTreeSet;

use crate::database::{CharacterDatabase, CharacterRecord};

/// `(composed, replacement)` pairs forced into the table.
pub type SpecialMapping = [(char, char)];

/// Built-in look-alike table.
pub const SPECIAL_DECOMPOSITIONS: &SpecialMapping = &[
    ('Æ', 'A'),
    ('Ð', 'D'),
    ('×', 'x'),
    ('Ø', 'O'),
    ('Þ', 'P'),
    ('ß', 'B'),
    ('æ', 'a'),
    ('ð', 'd'),
    ('ø', 'o'),
    ('þ', 'p'),
    // dashes
    ('\u{2010}', '-'),
    ('\u{2012}', '-'),
    ('\u{2013}', '-'),
    ('\u{2212}', '-'),
    ('\u{2014}', '-'),
    ('\u{2015}', '-'),
    // quotes, primes, ditto
    ('\u{2018}', '\''),
    ('\u{2019}', '\''),
    ('\u{2032}', '\''),
    ('\u{201C}', '"'),
    ('\u{201D}', '"'),
    ('\u{2033}', '"'),
    ('\u{3003}', '"'),
    ('\u{2026}', '.'),
];

/// Overwrite the decomposition of every mapped character with its replacement.
///
/// Characters missing from `db` get a fresh unnamed record. Returns the set of
/// forced code points, which [`crate::filter::filter`] must keep.
pub fn augment(db: &mut CharacterDatabase, mapping: &SpecialMapping) -> BTreeSet<u32> {
    let mut forced = BTreeSet::new();
    for &(composed, base) in mapping {
        let code_point = u32::from(composed);
        if !db.contains(code_point) {
            tracing::debug!("U+{:04X} not in database, adding forced record", code_point);
            db.insert(code_point, CharacterRecord::new(String::new()));
        }
        let record = db.entry(code_point);
        record.decomposition = vec![u32::from(base)];
        forced.insert(code_point);
    }
    forced
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_is_ascii_targets_only() {
        for &(composed, base) in SPECIAL_DECOMPOSITIONS {
            assert!(!composed.is_ascii(), "{composed} should not be ASCII");
            assert!(base.is_ascii(), "{composed} -> {base} should map to ASCII");
        }
    }

    #[test]
    fn builtin_table_has_no_duplicate_keys() {
        let keys: BTreeSet<char> = SPECIAL_DECOMPOSITIONS.iter().map(|(c, _)| *c).collect();
        assert_eq!(keys.len(), SPECIAL_DECOMPOSITIONS.len());
    }

    #[test]
    fn augment_overwrites_existing_record() {
        let mut db = CharacterDatabase::new();
        db.insert(0xC6, CharacterRecord::new("LATIN CAPITAL LETTER AE"));
        let forced = augment(&mut db, &[('Æ', 'A')]);
        assert_eq!(db.decomposition(0xC6), &[0x41]);
        assert_eq!(db.get(0xC6).unwrap().name, "LATIN CAPITAL LETTER AE");
        assert!(forced.contains(&0xC6));
    }

    #[test]
    fn augment_inserts_missing_record() {
        let mut db = CharacterDatabase::new();
        let forced = augment(&mut db, &[('\u{2026}', '.')]);
        assert_eq!(db.decomposition(0x2026), &[0x2E]);
        assert_eq!(forced.len(), 1);
    }

    #[test]
    fn augment_replaces_multi_element_mapping() {
        let mut db = CharacterDatabase::new();
        db.insert(
            0x2026,
            CharacterRecord {
                name: "HORIZONTAL ELLIPSIS".into(),
                decomposition: vec![0x2E, 0x2E, 0x2E],
                is_compatibility: true,
            },
        );
        augment(&mut db, SPECIAL_DECOMPOSITIONS);
        let rec = db.get(0x2026).unwrap();
        assert_eq!(rec.decomposition, vec![0x2E]);
        assert_eq!(rec.name, "HORIZONTAL ELLIPSIS");
    }
}
