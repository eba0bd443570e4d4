//! Recursive flattening of decompositions.
//!
//! `U+1EA6 Ầ` decomposes to `U+00C2 U+0300`, and `U+00C2 Â` in turn to
//! `U+0041 U+0302`. After this pass `U+1EA6` maps straight to
//! `U+0041 U+0302 U+0300`: the first element is always a character that
//! does not decompose any further.
//!
//! The traversal is an explicit depth-first work-list with a memo table, so
//! long chains never grow the native stack. Chains that loop back on
//! themselves are reported as [`BuildError::Cycle`].

use std::collections::{HashMap, HashSet};

use crate::database::CharacterDatabase;
use crate::error::BuildError;

/// Memoizing expander over a read-only database.
pub struct Expander<'a> {
    db: &'a CharacterDatabase,
    memo: HashMap<u32, Vec<u32>>,
}

impl<'a> Expander<'a> {
    /// Create an expander with an empty memo table.
    pub fn new(db: &'a CharacterDatabase) -> Self {
        Self {
            db,
            memo: HashMap::new(),
        }
    }

    /// Full expansion of `code_point`.
    ///
    /// A code point without a decomposition (or unknown to the database)
    /// expands to itself.
    ///
    /// # Errors
    ///
    /// [`BuildError::Cycle`] if the decomposition chain is cyclic.
    pub fn expansion(&mut self, code_point: u32) -> Result<Vec<u32>, BuildError> {
        if self.db.decomposition(code_point).is_empty() {
            return Ok(vec![code_point]);
        }
        self.resolve(code_point)?;
        Ok(self.memo.get(&code_point).cloned().unwrap_or_else(|| vec![code_point]))
    }

    /// Fill the memo table for `root` and everything it depends on.
    fn resolve(&mut self, root: u32) -> Result<(), BuildError> {
        if self.memo.contains_key(&root) {
            return Ok(());
        }

        // (code point, index of the next decomposition element to visit)
        let mut stack: Vec<(u32, usize)> = vec![(root, 0)];
        let mut on_stack: HashSet<u32> = HashSet::from([root]);

        while let Some(&(code_point, next)) = stack.last() {
            let decomposition = self.db.decomposition(code_point);

            if let Some(&child) = decomposition.get(next) {
                if let Some(top) = stack.last_mut() {
                    top.1 = next.saturating_add(1);
                }
                if self.db.decomposition(child).is_empty() || self.memo.contains_key(&child) {
                    continue;
                }
                if !on_stack.insert(child) {
                    return Err(BuildError::Cycle { code_point: child });
                }
                stack.push((child, 0));
                continue;
            }

            // every element resolved: concatenate
            let mut expansion = Vec::with_capacity(decomposition.len());
            for child in decomposition {
                match self.memo.get(child) {
                    Some(sub) => expansion.extend_from_slice(sub),
                    None => expansion.push(*child),
                }
            }
            self.memo.insert(code_point, expansion);
            on_stack.remove(&code_point);
            stack.pop();
        }

        Ok(())
    }
}

/// Replace every decomposition in `db` with its full expansion.
///
/// Records without a decomposition are left untouched. Returns the number of
/// records whose decomposition was replaced.
///
/// # Errors
///
/// [`BuildError::Cycle`] if any decomposition chain is cyclic; `db` is left
/// unmodified in that case.
pub fn expand(db: &mut CharacterDatabase) -> Result<usize, BuildError> {
    let mut expanded = Vec::new();
    {
        let mut expander = Expander::new(db);
        for code_point in db.code_points() {
            if db.decomposition(code_point).is_empty() {
                continue;
            }
            let expansion = expander.expansion(code_point)?;
            if expansion.as_slice() != [code_point] {
                expanded.push((code_point, expansion));
            }
        }
    }

    let count = expanded.len();
    for (code_point, expansion) in expanded {
        if let Some(record) = db.get_mut(code_point) {
            record.decomposition = expansion;
        }
    }
    tracing::debug!(count, "decompositions flattened");
    Ok(count)
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
    use crate::database::CharacterRecord;

    fn db(entries: &[(u32, &[u32])]) -> CharacterDatabase {
        entries
            .iter()
            .map(|&(cp, d)| (cp, CharacterRecord::with_decomposition("", d.to_vec())))
            .collect()
    }

    #[test]
    fn leaf_expands_to_itself() {
        let db = db(&[(0x41, &[])]);
        assert_eq!(Expander::new(&db).expansion(0x41).unwrap(), vec![0x41]);
        assert_eq!(Expander::new(&db).expansion(0x42).unwrap(), vec![0x42]);
    }

    #[test]
    fn two_level_chain_is_flattened_in_order() {
        // Ầ -> Â + grave, Â -> A + circumflex
        let mut db = db(&[
            (0x41, &[]),
            (0xC2, &[0x41, 0x302]),
            (0x1EA6, &[0xC2, 0x300]),
        ]);
        expand(&mut db).unwrap();
        assert_eq!(db.decomposition(0x1EA6), &[0x41, 0x302, 0x300]);
        assert_eq!(db.decomposition(0xC2), &[0x41, 0x302]);
        assert!(db.decomposition(0x41).is_empty());
    }

    #[test]
    fn every_element_is_expanded_not_just_the_first() {
        let mut db = db(&[(0x10, &[0x20, 0x30]), (0x30, &[0x31, 0x32]), (0x32, &[0x33])]);
        expand(&mut db).unwrap();
        assert_eq!(db.decomposition(0x10), &[0x20, 0x31, 0x33]);
    }

    #[test]
    fn expansion_is_idempotent() {
        let mut once = db(&[(0xC2, &[0x41, 0x302]), (0x1EA6, &[0xC2, 0x300])]);
        expand(&mut once).unwrap();
        let mut twice = once.clone();
        expand(&mut twice).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn long_chain_does_not_overflow() {
        // 1 -> 0, 2 -> 1, ... far deeper than native recursion would survive
        let mut db: CharacterDatabase = (1..200_000u32)
            .map(|cp| (cp, CharacterRecord::with_decomposition("", vec![cp - 1])))
            .collect();
        assert_eq!(Expander::new(&db).expansion(199_999).unwrap(), vec![0]);
        assert_eq!(expand(&mut db).unwrap(), 199_999);
        assert_eq!(db.decomposition(123_456), &[0]);
    }

    #[test]
    fn self_reference_is_a_cycle() {
        let mut db = db(&[(0x41, &[0x41])]);
        assert!(matches!(expand(&mut db), Err(BuildError::Cycle { code_point: 0x41 })));
    }

    #[test]
    fn indirect_cycle_is_detected_and_db_untouched() {
        let mut db = db(&[(0x41, &[0x42, 0x300]), (0x42, &[0x41, 0x301]), (0xC0, &[0x43, 0x300])]);
        let before = db.clone();
        let err = expand(&mut db).unwrap_err();
        assert!(matches!(err, BuildError::Cycle { .. }));
        assert_eq!(db, before);
    }

    #[test]
    fn shared_dependency_is_not_a_cycle() {
        // diamond: both elements of 0x10 go through 0x20
        let mut db = db(&[(0x10, &[0x11, 0x12]), (0x11, &[0x20]), (0x12, &[0x20]), (0x20, &[0x41, 0x300])]);
        expand(&mut db).unwrap();
        assert_eq!(db.decomposition(0x10), &[0x41, 0x300, 0x41, 0x300]);
    }
}
