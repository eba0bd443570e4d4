//! Character database — parsed `UnicodeData.txt`.
//!
//! Each line of the UCD file is a semicolon-separated record:
//!
//! ```text
//! 00C0;LATIN CAPITAL LETTER A WITH GRAVE;Lu;0;L;0041 0300;;;;N;LATIN CAPITAL LETTER A GRAVE;;;00E0;
//! ^^^^ ^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^       ^^^^^^^^^
//! 0    1                                       5 (decomposition, optional `<tag>` prefix)
//! ```
//!
//! Only fields 0, 1 and 5 are kept. The database is an ordered map so every
//! later pass (and the emitted table) sees code points in ascending order.

use std::collections::btree_map::{self, BTreeMap};
use std::io::BufRead;

use crate::error::{BuildError, ParseError, ParseErrorKind};

/// Index of the decomposition mapping column.
const DECOMPOSITION_FIELD: usize = 5;

/// Highest valid Unicode scalar range bound.
const MAX_CODE_POINT: u32 = 0x10_FFFF;

/// One `UnicodeData.txt` entry, reduced to what the builder needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterRecord {
    /// Character name (field 1), e.g. `LATIN SMALL LETTER E WITH ACUTE`.
    pub name: String,
    /// Code points this character decomposes to; empty when it has none.
    pub decomposition: Vec<u32>,
    /// `true` when the mapping carried a `<tag>` (compatibility decomposition).
    pub is_compatibility: bool,
}

impl CharacterRecord {
    /// A record with no decomposition.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            decomposition: Vec::new(),
            is_compatibility: false,
        }
    }

    /// A record with a canonical decomposition.
    pub fn with_decomposition(name: impl Into<String>, decomposition: Vec<u32>) -> Self {
        Self {
            name: name.into(),
            decomposition,
            is_compatibility: false,
        }
    }
}

/// Code point → record map, mutated in place by the builder passes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterDatabase {
    records: BTreeMap<u32, CharacterRecord>,
}

impl CharacterDatabase {
    /// Create an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a full `UnicodeData.txt` stream.
    ///
    /// # Errors
    ///
    /// [`BuildError::Io`] if the reader fails, [`BuildError::Parse`] on the
    /// first malformed line.
    pub fn parse<R: BufRead>(reader: R) -> Result<Self, BuildError> {
        let mut db = Self::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            db.parse_into(idx.saturating_add(1), &line)?;
        }
        Ok(db)
    }

    /// Parse `UnicodeData.txt` content already held in memory.
    ///
    /// # Errors
    ///
    /// Returns the [`ParseError`] of the first malformed line.
    pub fn parse_str(text: &str) -> Result<Self, ParseError> {
        let mut db = Self::new();
        for (idx, line) in text.lines().enumerate() {
            db.parse_into(idx.saturating_add(1), line)?;
        }
        Ok(db)
    }

    fn parse_into(&mut self, line_no: usize, line: &str) -> Result<(), ParseError> {
        if line.trim().is_empty() {
            return Ok(());
        }
        let (code_point, record) = parse_line(line).map_err(|kind| ParseError {
            line: line_no,
            kind,
        })?;
        if self.records.insert(code_point, record).is_some() {
            tracing::warn!(line = line_no, "duplicate record for U+{:04X}, keeping the later one", code_point);
        }
        Ok(())
    }

    /// Insert or replace a record, returning the previous one.
    pub fn insert(&mut self, code_point: u32, record: CharacterRecord) -> Option<CharacterRecord> {
        self.records.insert(code_point, record)
    }

    /// Look up a record.
    pub fn get(&self, code_point: u32) -> Option<&CharacterRecord> {
        self.records.get(&code_point)
    }

    /// Look up a record for modification.
    pub fn get_mut(&mut self, code_point: u32) -> Option<&mut CharacterRecord> {
        self.records.get_mut(&code_point)
    }

    /// Record for `code_point`, created empty if missing.
    pub fn entry(&mut self, code_point: u32) -> &mut CharacterRecord {
        self.records.entry(code_point).or_default()
    }

    /// Whether `code_point` has a record.
    pub fn contains(&self, code_point: u32) -> bool {
        self.records.contains_key(&code_point)
    }

    /// Decomposition of `code_point`; empty if it has none or is unknown.
    pub fn decomposition(&self, code_point: u32) -> &[u32] {
        self.records
            .get(&code_point)
            .map_or(&[], |r| r.decomposition.as_slice())
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// `true` when there are no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in ascending code point order.
    pub fn iter(&self) -> btree_map::Iter<'_, u32, CharacterRecord> {
        self.records.iter()
    }

    /// Code points in ascending order.
    pub fn code_points(&self) -> impl Iterator<Item = u32> + '_ {
        self.records.keys().copied()
    }

    /// Keep only the records for which `keep` returns `true`.
    pub fn retain(&mut self, mut keep: impl FnMut(u32, &CharacterRecord) -> bool) {
        self.records.retain(|cp, record| keep(*cp, record));
    }
}

impl<'a> IntoIterator for &'a CharacterDatabase {
    type Item = (&'a u32, &'a CharacterRecord);
    type IntoIter = btree_map::Iter<'a, u32, CharacterRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<(u32, CharacterRecord)> for CharacterDatabase {
    fn from_iter<I: IntoIterator<Item = (u32, CharacterRecord)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

/// Parse one non-empty `UnicodeData.txt` line.
pub fn parse_line(line: &str) -> Result<(u32, CharacterRecord), ParseErrorKind> {
    let fields: Vec<&str> = line.split(';').collect();
    if fields.len() <= DECOMPOSITION_FIELD {
        return Err(ParseErrorKind::MissingFields(fields.len()));
    }

    let code_field = fields.first().copied().unwrap_or_default().trim();
    let name = fields.get(1).copied().unwrap_or_default();
    let decomposition_field = fields.get(DECOMPOSITION_FIELD).copied().unwrap_or_default();

    let code_point = parse_hex(code_field)
        .ok_or_else(|| ParseErrorKind::InvalidCodePoint(code_field.to_owned()))?;
    if code_point > MAX_CODE_POINT {
        return Err(ParseErrorKind::CodePointOutOfRange(code_point));
    }

    let (decomposition, is_compatibility) = parse_decomposition(decomposition_field)?;

    Ok((
        code_point,
        CharacterRecord {
            name: name.to_owned(),
            decomposition,
            is_compatibility,
        },
    ))
}

/// Parse field 5: `[<tag> ]XXXX[ XXXX...]`, or empty.
fn parse_decomposition(field: &str) -> Result<(Vec<u32>, bool), ParseErrorKind> {
    let field = field.trim();
    if field.is_empty() {
        return Ok((Vec::new(), false));
    }

    let (mapping, is_compatibility) = match field.strip_prefix('<') {
        Some(tagged) => {
            let (_tag, rest) = tagged
                .split_once('>')
                .ok_or_else(|| ParseErrorKind::UnterminatedTag(field.to_owned()))?;
            let rest = rest.trim();
            if rest.is_empty() {
                return Err(ParseErrorKind::EmptyTaggedDecomposition(field.to_owned()));
            }
            (rest, true)
        }
        None => (field, false),
    };

    let codes = mapping
        .split_whitespace()
        .map(|v| {
            parse_hex(v)
                .filter(|&cp| cp <= MAX_CODE_POINT)
                .ok_or_else(|| ParseErrorKind::InvalidDecomposition(v.to_owned()))
        })
        .collect::<Result<Vec<u32>, _>>()?;

    Ok((codes, is_compatibility))
}

/// Strict hex: non-empty, ASCII hex digits only (no sign, no `0x`).
fn parse_hex(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(s, 16).ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    const A_GRAVE: &str =
        "00C0;LATIN CAPITAL LETTER A WITH GRAVE;Lu;0;L;0041 0300;;;;N;LATIN CAPITAL LETTER A GRAVE;;;00E0;";
    const LATIN_A: &str = "0061;LATIN SMALL LETTER A;Ll;0;L;;;;;N;;;0041;;0041";

    #[test]
    fn parses_canonical_decomposition() {
        let (cp, rec) = parse_line(A_GRAVE).unwrap();
        assert_eq!(cp, 0xC0);
        assert_eq!(rec.name, "LATIN CAPITAL LETTER A WITH GRAVE");
        assert_eq!(rec.decomposition, vec![0x41, 0x300]);
        assert!(!rec.is_compatibility);
    }

    #[test]
    fn parses_record_without_decomposition() {
        let (cp, rec) = parse_line(LATIN_A).unwrap();
        assert_eq!(cp, 0x61);
        assert!(rec.decomposition.is_empty());
        assert!(!rec.is_compatibility);
    }

    #[test]
    fn strips_compat_tag() {
        let line = "1D41A;MATHEMATICAL BOLD SMALL A;Ll;0;L;<font> 0061;;;;N;;;;;";
        let (cp, rec) = parse_line(line).unwrap();
        assert_eq!(cp, 0x1D41A);
        assert_eq!(rec.decomposition, vec![0x61]);
        assert!(rec.is_compatibility);
    }

    #[test]
    fn compat_tag_with_several_elements() {
        let line = "01C4;LATIN CAPITAL LETTER DZ WITH CARON;Lu;0;L;<compat> 0044 017D;;;;N;;;;01C6;01C5";
        let (_, rec) = parse_line(line).unwrap();
        assert_eq!(rec.decomposition, vec![0x44, 0x17D]);
        assert!(rec.is_compatibility);
    }

    #[test]
    fn rejects_non_hex_code_point() {
        let err = parse_line("00G0;BROKEN;Lu;0;L;;;;;N;;;;;").unwrap_err();
        assert_eq!(err, ParseErrorKind::InvalidCodePoint("00G0".into()));
    }

    #[test]
    fn rejects_signed_code_point() {
        assert!(matches!(
            parse_line("+41;BROKEN;Lu;0;L;;;;;N;;;;;"),
            Err(ParseErrorKind::InvalidCodePoint(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_code_point() {
        assert_eq!(
            parse_line("110000;TOO BIG;Co;0;L;;;;;N;;;;;").unwrap_err(),
            ParseErrorKind::CodePointOutOfRange(0x11_0000)
        );
    }

    #[test]
    fn rejects_bad_decomposition_entry() {
        let err = parse_line("00C0;BROKEN;Lu;0;L;0041 03ZZ;;;;N;;;;;").unwrap_err();
        assert_eq!(err, ParseErrorKind::InvalidDecomposition("03ZZ".into()));
    }

    #[test]
    fn rejects_unterminated_tag() {
        assert!(matches!(
            parse_line("00C0;BROKEN;Lu;0;L;<compat 0041;;;;N;;;;;"),
            Err(ParseErrorKind::UnterminatedTag(_))
        ));
    }

    #[test]
    fn rejects_tag_without_mapping() {
        assert!(matches!(
            parse_line("00C0;BROKEN;Lu;0;L;<compat>;;;;N;;;;;"),
            Err(ParseErrorKind::EmptyTaggedDecomposition(_))
        ));
    }

    #[test]
    fn rejects_short_line() {
        assert_eq!(
            parse_line("0041;LATIN CAPITAL LETTER A;Lu").unwrap_err(),
            ParseErrorKind::MissingFields(3)
        );
    }

    #[test]
    fn parse_str_reports_line_number() {
        let text = format!("{LATIN_A}\n{A_GRAVE}\nzzzz;BROKEN;Lu;0;L;;;;;N;;;;;\n");
        let err = CharacterDatabase::parse_str(&text).unwrap_err();
        assert_eq!(err.line, 3);
        assert!(err.to_string().starts_with("line 3:"));
    }

    #[test]
    fn parse_skips_blank_lines() {
        let text = format!("{LATIN_A}\n\n{A_GRAVE}\n");
        let db = CharacterDatabase::parse(text.as_bytes()).unwrap();
        assert_eq!(db.len(), 2);
        assert_eq!(db.decomposition(0xC0), &[0x41, 0x300]);
        assert!(db.decomposition(0x61).is_empty());
    }

    #[test]
    fn later_duplicate_wins() {
        let text = "00C0;FIRST;Lu;0;L;;;;;N;;;;;\n00C0;SECOND;Lu;0;L;0041 0300;;;;N;;;;;\n";
        let db = CharacterDatabase::parse_str(text).unwrap();
        assert_eq!(db.len(), 1);
        assert_eq!(db.get(0xC0).unwrap().name, "SECOND");
    }

    #[test]
    fn decomposition_of_unknown_is_empty() {
        assert!(CharacterDatabase::new().decomposition(0x41).is_empty());
    }
}
