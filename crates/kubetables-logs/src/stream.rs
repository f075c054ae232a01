use std::io::Write;

use futures::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use kubetables_types::StreamIdentity;

use crate::error::Error;
use crate::filter::CompiledFilter;
use crate::grouper::Grouper;
use crate::parser::LogParser;

/// Drop the line terminator (`\n` or `\r\n`)
fn strip_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Read a container's log stream to the end, grouping its records.
///
/// The reader is consumed and dropped before this returns, whatever the
/// outcome. A read error aborts immediately and the partial tables are
/// discarded.
pub async fn collect_tables<R>(
    mut reader: R,
    source_filter: &CompiledFilter,
) -> Result<Grouper, Error>
where
    R: AsyncBufRead + Unpin,
{
    let mut grouper = Grouper::new(source_filter.clone());
    let mut line = Vec::new();
    let mut line_count: u64 = 0;

    loop {
        line.clear();
        let read = reader.read_until(b'\n', &mut line).await.map_err(Error::Read)?;
        if read == 0 {
            break;
        }

        line_count += 1;
        grouper.add(LogParser::parse(strip_terminator(&line)));
    }

    debug!(
        lines = line_count,
        kept = grouper.kept(),
        discarded = grouper.discarded(),
        tables = grouper.len(),
        "log stream drained"
    );

    Ok(grouper)
}

/// Drain one container's stream and print its tables.
///
/// Nothing is written when reading fails. Returns the number of tables printed.
pub async fn render_stream<R, W>(
    reader: R,
    identity: &StreamIdentity,
    source_filter: &CompiledFilter,
    out: &mut W,
) -> Result<usize, Error>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let grouper = collect_tables(reader, source_filter).await?;
    let tables = grouper.len();
    grouper.print(identity, out)?;
    out.flush().map_err(Error::Write)?;
    Ok(tables)
}
