use std::collections::BTreeMap;
use std::io::Write;

use kubetables_types::{Record, StreamIdentity, source_of};

use crate::error::Error;
use crate::filter::CompiledFilter;
use crate::table::Table;

/// Routes the records of one container stream into one table per source
#[derive(Debug)]
pub struct Grouper {
    source_filter: CompiledFilter,

    /// Keyed by source; iteration order is the output order
    tables: BTreeMap<String, Table>,

    kept: usize,
    discarded: usize,
}

impl Grouper {
    pub fn new(source_filter: CompiledFilter) -> Self {
        Self {
            source_filter,
            tables: BTreeMap::new(),
            kept: 0,
            discarded: 0,
        }
    }

    /// Add a record to the table of its source.
    ///
    /// Returns false when the source filter rejected it.
    pub fn add(&mut self, record: Record) -> bool {
        let source = source_of(&record);
        if !self.source_filter.is_match(source) {
            self.discarded += 1;
            return false;
        }

        if let Some(table) = self.tables.get_mut(source) {
            table.add_row(record);
        } else {
            let source = source.to_string();
            let mut table = Table::new();
            table.add_row(record);
            self.tables.insert(source, table);
        }

        self.kept += 1;
        true
    }

    /// Sources seen so far, in output order
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn table(&self, source: &str) -> Option<&Table> {
        self.tables.get(source)
    }

    /// Number of tables
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn kept(&self) -> usize {
        self.kept
    }

    pub fn discarded(&self) -> usize {
        self.discarded
    }

    /// Print every table under its banner, sources in lexicographic order
    pub fn print<W: Write>(self, identity: &StreamIdentity, out: &mut W) -> Result<(), Error> {
        for (source, table) in self.tables {
            writeln!(out, "{}\n", identity.banner(&source)).map_err(Error::Write)?;
            table.print(out).map_err(Error::Write)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_groups_by_source() {
        let mut grouper = Grouper::new(CompiledFilter::match_all());
        assert!(grouper.add(record(json!({"source": "db", "msg": "a"}))));
        assert!(grouper.add(record(json!({"source": "api", "msg": "b"}))));
        assert!(grouper.add(record(json!({"source": "db", "msg": "c"}))));
        assert!(grouper.add(record(json!({"msg": "d"}))));

        assert_eq!(grouper.sources().collect::<Vec<_>>(), ["", "api", "db"]);
        assert_eq!(grouper.table("db").map(|t| t.rows().len()), Some(2));
        assert_eq!(grouper.table("").map(|t| t.rows().len()), Some(1));
        assert_eq!(grouper.kept(), 4);
    }

    #[test]
    fn test_non_string_source_groups_as_empty() {
        let mut grouper = Grouper::new(CompiledFilter::match_all());
        grouper.add(record(json!({"source": 3, "msg": "a"})));
        grouper.add(record(json!({"source": null, "msg": "b"})));

        assert_eq!(grouper.sources().collect::<Vec<_>>(), [""]);
        assert_eq!(grouper.table("").map(|t| t.rows().len()), Some(2));
    }

    #[test]
    fn test_source_filter_discards() {
        let mut grouper = Grouper::new(CompiledFilter::new("^api$").unwrap());
        assert!(grouper.add(record(json!({"source": "api"}))));
        assert!(!grouper.add(record(json!({"source": "db"}))));
        assert!(!grouper.add(record(json!({"msg": "no source"}))));

        assert_eq!(grouper.sources().collect::<Vec<_>>(), ["api"]);
        assert_eq!(grouper.kept(), 1);
        assert_eq!(grouper.discarded(), 2);
    }

    #[test]
    fn test_tables_created_lazily() {
        let mut grouper = Grouper::new(CompiledFilter::new("keep").unwrap());
        assert!(grouper.is_empty());
        grouper.add(record(json!({"source": "drop"})));
        assert!(grouper.is_empty());
    }

    #[test]
    fn test_print_orders_sources() {
        let mut grouper = Grouper::new(CompiledFilter::match_all());
        grouper.add(record(json!({"source": "b", "msg": "second"})));
        grouper.add(record(json!({"source": "a", "msg": "first"})));

        let identity = StreamIdentity::new("ns", "pod", "c");
        let mut out = Vec::new();
        grouper.print(&identity, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let a = text.find("source=a").unwrap();
        let b = text.find("source=b").unwrap();
        assert!(a < b);
        assert!(text.starts_with("namespace=ns, pod=pod, container=c, source=a\n\n"));
    }
}
