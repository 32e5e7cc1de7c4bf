//! Telemetry worker
//!
//! Reads device status lines, surfaces them to the operator display, and
//! persists one log record per parsed line. Owns the inbound half of the
//! link; never sends.

use crate::display::DisplayHandle;
use crate::MonitorError;
use logbook::{LogEntry, Logbook};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use telemetry_link::{parse_status_line, LinkReader, StatusReport};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// The device-status half of the risk-fusion loop
pub struct TelemetryWorker {
    reader: LinkReader,
    display: DisplayHandle,
    logbook: Arc<Mutex<Logbook>>,
    read_timeout: Duration,
    stop: watch::Receiver<bool>,
}

impl TelemetryWorker {
    pub fn new(
        reader: LinkReader,
        display: DisplayHandle,
        logbook: Arc<Mutex<Logbook>>,
        read_timeout: Duration,
        stop: watch::Receiver<bool>,
    ) -> Self {
        Self {
            reader,
            display,
            logbook,
            read_timeout,
            stop,
        }
    }

    /// Run until the link is lost or a stop is requested. The bounded
    /// read timeout caps how long a stop request can go unnoticed.
    pub async fn run(mut self) -> Result<(), MonitorError> {
        info!("telemetry worker started");

        loop {
            if *self.stop.borrow() {
                break;
            }

            let line = match self.reader.read_line(self.read_timeout).await {
                Ok(Some(line)) => line,
                Ok(None) => continue,
                Err(e) => {
                    error!("telemetry link lost: {}", e);
                    return Err(e.into());
                }
            };

            match parse_status_line(&line) {
                Ok(Some(report)) => self.handle_report(report),
                // Not a status line; the device chatters at boot.
                Ok(None) => {}
                Err(e) => warn!("discarding malformed status line {:?}: {}", line, e),
            }
        }

        info!("telemetry worker stopped");
        Ok(())
    }

    fn handle_report(&mut self, report: StatusReport) {
        debug!(
            risk = %report.risk,
            distance_cm = report.distance_cm,
            status = %report.status,
            "device status report"
        );

        self.display.set_distance(report.distance_cm);
        self.display.set_status(report.status.clone());

        // Log the device-reported risk token, not the locally computed
        // level; the two streams are independent.
        let entry = LogEntry::now(report.risk, report.distance_cm, report.status);
        let mut logbook = self.logbook.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = logbook.append(&entry) {
            warn!("failed to persist status report: {}", e);
        }
    }
}
