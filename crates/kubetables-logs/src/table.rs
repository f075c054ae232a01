use std::collections::HashMap;

use serde_json::Value;
use unicode_width::UnicodeWidthStr;

use kubetables_types::Record;

/// Every tab is replaced by this many spaces
const TAB_EXPANSION: &str = "        ";

/// Render a value the way it appears in a table cell.
///
/// Strings print raw, everything else as compact JSON. `\n` is removed and
/// tabs expanded so that every cell stays on one line.
pub fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => sanitize(s),
        other => sanitize(&other.to_string()),
    }
}

fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\n' => {}
            '\t' => out.push_str(TAB_EXPANSION),
            c => out.push(c),
        }
    }
    out
}

/// Records of one source within one container stream, plus the widest
/// rendering seen so far for every field.
///
/// Non-empty text counts as at least one column wide even when it has no
/// display width (zero-width space, lone combining mark), so a tracked width
/// of 0 means the field never held any text.
#[derive(Debug, Default)]
pub struct Table {
    pub(crate) rows: Vec<Record>,
    pub(crate) field_widths: HashMap<String, usize>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track the width of every field of `row`, then append it
    pub fn add_row(&mut self, row: Record) {
        for (key, value) in &row {
            let text = display_text(value);
            let width = if text.is_empty() { 0 } else { text.width().max(1) };
            let tracked = self.field_widths.entry(key.clone()).or_insert(0);
            *tracked = (*tracked).max(width);
        }

        self.rows.push(row);
    }

    /// Rows in arrival order
    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    /// Widest value rendering seen for a field, if the field was seen at all
    pub fn tracked_width(&self, field: &str) -> Option<usize> {
        self.field_widths.get(field).copied()
    }
}
