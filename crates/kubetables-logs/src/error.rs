use std::io;

use thiserror::Error;

/// Errors raised while turning a log stream into tables
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid filter pattern '{pattern}'")]
    Filter {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The underlying stream failed before end of stream
    #[error("failed to read log stream")]
    Read(#[source] io::Error),

    #[error("failed to write table output")]
    Write(#[source] io::Error),
}
