use std::io::{self, Write};

use unicode_width::UnicodeWidthStr;

use crate::table::{Table, display_text};

/// Cell text for a column the row does not have
pub const ABSENT_PLACEHOLDER: &str = "-";

/// Written after every cell, the last one included
const SEPARATOR: &str = " | ";

/// Columns that lead every table, compared case-insensitively
const LEADING_FIELDS: [&str; 5] = ["timestamp", "level", "filename", "linenumber", "msg"];

/// A surviving column with its final width
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub width: usize,
}

fn priority(lowercase_name: &str) -> usize {
    LEADING_FIELDS
        .iter()
        .position(|f| *f == lowercase_name)
        .unwrap_or(LEADING_FIELDS.len())
}

fn write_cell<W: Write>(out: &mut W, text: &str, width: usize) -> io::Result<()> {
    let pad = width.saturating_sub(text.width());
    write!(out, "{}{:pad$}{}", text, "", SEPARATOR)
}

impl Table {
    /// Columns in output order.
    ///
    /// Fields that never held non-empty text are dropped. Widths grow
    /// to fit the header. Well-known fields lead, the rest follow
    /// alphabetically ignoring case.
    pub fn columns(&self) -> Vec<Column> {
        let mut columns: Vec<Column> = self
            .field_widths
            .iter()
            .filter(|(_, width)| **width > 0)
            .map(|(name, width)| Column {
                name: name.clone(),
                width: (*width).max(name.width()),
            })
            .collect();

        columns.sort_by_cached_key(|c| {
            let lower = c.name.to_lowercase();
            (priority(&lower), lower, c.name.clone())
        });

        columns
    }

    /// Write the header, one line per row and a trailing blank line
    pub fn print<W: Write>(self, out: &mut W) -> io::Result<()> {
        let columns = self.columns();

        for column in &columns {
            write_cell(out, &column.name, column.width)?;
        }
        writeln!(out)?;

        for row in &self.rows {
            for column in &columns {
                match row.get(&column.name) {
                    Some(value) => write_cell(out, &display_text(value), column.width)?,
                    None => write_cell(out, ABSENT_PLACEHOLDER, column.width)?,
                }
            }
            writeln!(out)?;
        }
        writeln!(out)
    }
}
