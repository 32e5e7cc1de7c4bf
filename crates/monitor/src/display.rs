//! Display sink hand-off
//!
//! Workers never touch the rendering context directly; they enqueue
//! updates on a bounded channel that the rendering side drains. Updates
//! are idempotent, so a dropped one is repaired by the next.

use risk_eval::RiskLevel;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// One operator-facing update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayUpdate {
    Risk(RiskLevel),
    Distance(u32),
    Status(String),
}

/// Create the display queue with the given depth
pub fn display_channel(depth: usize) -> (DisplayHandle, mpsc::Receiver<DisplayUpdate>) {
    let (tx, rx) = mpsc::channel(depth.max(1));
    (DisplayHandle { tx }, rx)
}

/// Worker-side handle to the display queue
#[derive(Debug, Clone)]
pub struct DisplayHandle {
    tx: mpsc::Sender<DisplayUpdate>,
}

impl DisplayHandle {
    pub fn set_risk(&self, level: RiskLevel) {
        self.push(DisplayUpdate::Risk(level));
    }

    pub fn set_distance(&self, distance_cm: u32) {
        self.push(DisplayUpdate::Distance(distance_cm));
    }

    pub fn set_status(&self, status: impl Into<String>) {
        self.push(DisplayUpdate::Status(status.into()));
    }

    // Rendering lag must never stall a worker; a full queue drops the
    // update instead of blocking.
    fn push(&self, update: DisplayUpdate) {
        if self.tx.try_send(update).is_err() {
            debug!("display queue unavailable, dropping update");
        }
    }
}

/// Headless drain of the display queue.
///
/// Stands in for the GUI: renders updates as log lines, with HIGH risk
/// escalated so it stands out on a console.
pub async fn run_headless_display(mut rx: mpsc::Receiver<DisplayUpdate>) {
    while let Some(update) = rx.recv().await {
        match update {
            DisplayUpdate::Risk(RiskLevel::High) => warn!("risk level: HIGH"),
            DisplayUpdate::Risk(level) => info!("risk level: {}", level),
            DisplayUpdate::Distance(distance_cm) => info!("distance: {} cm", distance_cm),
            DisplayUpdate::Status(status) => info!("system status: {}", status),
        }
    }
    debug!("display queue closed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_updates_arrive_in_order() {
        let (handle, mut rx) = display_channel(8);

        handle.set_risk(RiskLevel::Low);
        handle.set_distance(42);
        handle.set_status("OK");

        assert_eq!(rx.recv().await, Some(DisplayUpdate::Risk(RiskLevel::Low)));
        assert_eq!(rx.recv().await, Some(DisplayUpdate::Distance(42)));
        assert_eq!(
            rx.recv().await,
            Some(DisplayUpdate::Status("OK".to_string()))
        );
    }

    #[tokio::test]
    async fn test_full_queue_drops_instead_of_blocking() {
        let (handle, mut rx) = display_channel(1);

        handle.set_distance(1);
        handle.set_distance(2); // dropped, queue depth is 1

        assert_eq!(rx.recv().await, Some(DisplayUpdate::Distance(1)));
        assert!(rx.try_recv().is_err());
    }
}
