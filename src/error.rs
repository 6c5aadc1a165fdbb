use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures of the csv event log. None of these ever stop a test session.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("cannot open event log {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("event log csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("cannot flush event log: {0}")]
    Flush(#[from] io::Error),

    #[error("event log already closed")]
    Closed,

    #[error("malformed event log record on line {line}: {reason}")]
    Malformed { line: u64, reason: String },
}
