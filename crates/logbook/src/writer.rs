//! CSV log writer

use crate::LogError;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// CSV header row
const HEADER: &str = "Timestamp,Risk,Distance,Status";

/// Timestamp column format
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One persisted telemetry record.
///
/// `risk` is the device-reported token from the status line, not the
/// locally computed level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub risk: String,
    pub distance_cm: u32,
    pub status: String,
}

impl LogEntry {
    /// Create an entry stamped with the current wall-clock time
    pub fn now(risk: impl Into<String>, distance_cm: u32, status: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            risk: risk.into(),
            distance_cm,
            status: status.into(),
        }
    }
}

/// Append-only CSV log file.
///
/// Created once at startup with a header row; records are appended in the
/// order received. `close` flushes and is idempotent, so every exit path
/// may call it.
pub struct Logbook {
    writer: Option<BufWriter<File>>,
    path: PathBuf,
    entries: u64,
}

impl Logbook {
    /// Create (or truncate) the log file and write the header row
    pub fn create(path: impl AsRef<Path>) -> Result<Self, LogError> {
        let path = path.as_ref().to_path_buf();
        info!("creating telemetry log at {}", path.display());

        let file = File::create(&path)?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "{HEADER}")?;

        Ok(Self {
            writer: Some(writer),
            path,
            entries: 0,
        })
    }

    /// Append one record.
    ///
    /// Field tokens are comma-free by the wire grammar, so the record is a
    /// plain comma join.
    pub fn append(&mut self, entry: &LogEntry) -> Result<(), LogError> {
        let writer = self.writer.as_mut().ok_or(LogError::Closed)?;
        writeln!(
            writer,
            "{},{},{},{}",
            entry.timestamp.format(TIMESTAMP_FORMAT),
            entry.risk,
            entry.distance_cm,
            entry.status
        )?;
        self.entries += 1;
        Ok(())
    }

    /// Flush and close the file. Safe to call more than once.
    pub fn close(&mut self) -> Result<(), LogError> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
            info!(
                "closed telemetry log {} ({} entries)",
                self.path.display(),
                self.entries
            );
        }
        Ok(())
    }

    /// Whether the logbook has been closed
    pub fn is_closed(&self) -> bool {
        self.writer.is_none()
    }

    /// Number of records appended so far
    pub fn entries(&self) -> u64 {
        self.entries
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for Logbook {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("failed to flush telemetry log on drop: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn temp_log(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("logbook-{}-{}.csv", std::process::id(), name))
    }

    #[test]
    fn test_append_and_read_back() {
        let path = temp_log("roundtrip");
        let mut logbook = Logbook::create(&path).unwrap();

        let entry = LogEntry {
            timestamp: Local.with_ymd_and_hms(2024, 3, 1, 12, 30, 45).unwrap(),
            risk: "LOW".to_string(),
            distance_cm: 42,
            status: "OK".to_string(),
        };
        logbook.append(&entry).unwrap();
        logbook.close().unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some("Timestamp,Risk,Distance,Status"));
        assert_eq!(lines.next(), Some("2024-03-01 12:30:45,LOW,42,OK"));
        assert_eq!(lines.next(), None);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_records_keep_arrival_order() {
        let path = temp_log("order");
        let mut logbook = Logbook::create(&path).unwrap();

        for distance in [100, 80, 120] {
            logbook.append(&LogEntry::now("NONE", distance, "OK")).unwrap();
        }
        assert_eq!(logbook.entries(), 3);
        logbook.close().unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let distances: Vec<&str> = contents
            .lines()
            .skip(1)
            .map(|l| l.split(',').nth(2).unwrap())
            .collect();
        assert_eq!(distances, ["100", "80", "120"]);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_close_is_idempotent() {
        let path = temp_log("close");
        let mut logbook = Logbook::create(&path).unwrap();

        logbook.close().unwrap();
        logbook.close().unwrap();
        assert!(logbook.is_closed());

        let err = logbook.append(&LogEntry::now("NONE", 0, "OK")).unwrap_err();
        assert!(matches!(err, LogError::Closed));

        std::fs::remove_file(&path).ok();
    }
}
