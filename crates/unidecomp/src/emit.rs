//! Render a [`DecompositionTable`] as source text.
//!
//! Two dialects are supported. `C` is the historical `unidecomp_map[]`
//! declaration consumed by the player's C string helpers:
//!
//! ```text
//! /* This file is automatically generated. DO NOT EDIT!
//! Instead, edit xtask gen-decomp and re-run. */
//!
//! static struct {
//! 	uchar composed;
//! 	uchar base;
//! } unidecomp_map[] = {
//! 	{   0xc0,   0x41 },	// À -> A,	 ̀ (300)
//! };
//! ```
//!
//! `Rust` emits the same rows as a `&[(u32, u32)]` static. The trailing
//! comment on every row shows the literal characters and the stripped marks;
//! nothing downstream parses it.

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use crate::error::UnknownFormat;
use crate::table::{DecompositionTable, TableEntry};

/// Output dialect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TableFormat {
    /// `static struct { uchar composed; uchar base; } unidecomp_map[]`
    #[default]
    C,
    /// `pub static UNIDECOMP_MAP: &[(u32, u32)]`
    Rust,
}

impl FromStr for TableFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "c" => Ok(Self::C),
            "rust" | "rs" => Ok(Self::Rust),
            _ => Err(UnknownFormat(s.to_owned())),
        }
    }
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::C => "c",
            Self::Rust => "rust",
        })
    }
}

/// Literal character for a code point; U+FFFD for non-scalar values.
fn literal(code_point: u32) -> char {
    char::from_u32(code_point).unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// `À -> A,	 ̀ (300)` style comment body.
fn describe(entry: &TableEntry, separator: &str) -> String {
    let marks: Vec<String> = entry
        .stripped
        .iter()
        .map(|&cp| format!(" {} ({:x})", literal(cp), cp))
        .collect();
    format!(
        "{} -> {},{}{}",
        literal(entry.composed),
        literal(entry.base),
        separator,
        marks.join(", ")
    )
}

/// Render `table` in `format`. `generator` names the tool in the header.
pub fn render_table(table: &DecompositionTable, format: TableFormat, generator: &str) -> String {
    let mut out = String::new();
    match format {
        TableFormat::C => {
            out.push_str(&format!(
                "/* This file is automatically generated. DO NOT EDIT!\n\
                 Instead, edit {generator} and re-run. */\n\
                 \n\
                 static struct {{\n\
                 \tuchar composed;\n\
                 \tuchar base;\n\
                 }} unidecomp_map[] = {{\n"
            ));
            for entry in table {
                out.push_str(&format!(
                    "\t{{ {:#6x}, {:#6x} }},\t// {}\n",
                    entry.composed,
                    entry.base,
                    describe(entry, "\t"),
                ));
            }
            out.push_str("};\n");
        }
        TableFormat::Rust => {
            out.push_str(&format!(
                "// This file is automatically generated. DO NOT EDIT!\n\
                 // Instead, edit {generator} and re-run.\n\
                 \n\
                 /// Composed character -> base character, sorted by composed code point.\n\
                 pub static UNIDECOMP_MAP: &[(u32, u32)] = &[\n"
            ));
            for entry in table {
                let row = format!(
                    "    ({:#06x}, {:#06x}), // {}",
                    entry.composed,
                    entry.base,
                    describe(entry, " "),
                );
                out.push_str(row.trim_end());
                out.push('\n');
            }
            out.push_str("];\n");
        }
    }
    out
}

/// Render `table` and write it to `writer` in one call.
///
/// # Errors
///
/// Propagates the writer's I/O error.
pub fn write_table<W: Write>(
    table: &DecompositionTable,
    format: TableFormat,
    generator: &str,
    writer: &mut W,
) -> io::Result<()> {
    writer.write_all(render_table(table, format, generator).as_bytes())?;
    writer.flush()
}
