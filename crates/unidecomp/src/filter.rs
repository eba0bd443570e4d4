//! Keep only the "letter + accent(s)" entries.
//!
//! After expansion most records are unrelated to diacritic stripping: ligatures,
//! compatibility forms, spacing accents. A record survives when its
//! decomposition starts with a real base character and carries at least one
//! combining diacritical mark after it. Forced look-alike entries always stay.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use crate::database::CharacterDatabase;

/// The Combining Diacritical Marks block.
pub const COMBINING_DIACRITICAL_MARKS: RangeInclusive<u32> = 0x0300..=0x036F;

/// Whether `code_point` is a combining diacritical mark.
#[inline]
pub fn is_diacritical_mark(code_point: u32) -> bool {
    COMBINING_DIACRITICAL_MARKS.contains(&code_point)
}

fn is_whitespace(code_point: u32) -> bool {
    char::from_u32(code_point).is_some_and(char::is_whitespace)
}

/// Whether a flattened decomposition maps a letter to letter + mark(s).
pub fn strips_accents(decomposition: &[u32]) -> bool {
    let Some((&base, marks)) = decomposition.split_first() else {
        return false;
    };
    if is_whitespace(base) || is_diacritical_mark(base) {
        return false;
    }
    marks.iter().copied().any(is_diacritical_mark)
}

/// Drop every record outside `forced` whose decomposition does not strip accents.
///
/// Returns the number of records removed.
pub fn filter(db: &mut CharacterDatabase, forced: &BTreeSet<u32>) -> usize {
    let before = db.len();
    db.retain(|code_point, record| {
        forced.contains(&code_point) || strips_accents(&record.decomposition)
    });
    let removed = before.saturating_sub(db.len());
    tracing::debug!(removed, kept = db.len(), "filtered non-accent records");
    removed
}
