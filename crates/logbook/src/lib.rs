//! Telemetry Logbook
//!
//! Append-only CSV persistence for device status reports. One record per
//! successfully parsed inbound line, written in arrival order; the file is
//! never rewritten or truncated mid-run.

mod writer;

pub use writer::{LogEntry, Logbook};

use thiserror::Error;

/// Logbook errors
#[derive(Debug, Error)]
pub enum LogError {
    #[error("log I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("logbook already closed")]
    Closed,
}
