//! Log processing for kubetables
//!
//! This crate parses container log lines into records, groups them by their
//! `source` field, and renders every group as an aligned text table.

mod error;
mod filter;
mod grouper;
mod parser;
mod render;
mod stream;
mod table;

pub use error::Error;
pub use filter::CompiledFilter;
pub use grouper::Grouper;
pub use parser::LogParser;
pub use render::{ABSENT_PLACEHOLDER, Column};
pub use stream::{collect_tables, render_stream};
pub use table::{Table, display_text};

// Re-export types used in our public API
pub use kubetables_types::{Record, StreamIdentity};
