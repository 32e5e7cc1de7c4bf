//! Lifecycle controller
//!
//! Owns the stop signal and the shutdown sequence: stop both workers,
//! send the fail-safe `NONE` so the device de-asserts its alert, then
//! release the link and the logbook. Shutdown is idempotent and must
//! complete on every exit path, so its internal failures are logged and
//! swallowed.

use crate::MonitorError;
use logbook::Logbook;
use risk_eval::RiskLevel;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use telemetry_link::LinkWriter;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error, info, warn};

/// Time the device gets to consume the fail-safe line before the port
/// goes away
const SETTLE_DELAY: Duration = Duration::from_millis(500);

/// How long to wait for a worker to observe the stop signal
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

type WorkerResult = Result<Result<(), MonitorError>, JoinError>;

/// Coordinates startup and graceful shutdown of the pipeline
pub struct Lifecycle {
    stop_tx: watch::Sender<bool>,
    writer: Arc<tokio::sync::Mutex<LinkWriter>>,
    logbook: Arc<Mutex<Logbook>>,
    fired: AtomicBool,
}

impl Lifecycle {
    pub fn new(writer: Arc<tokio::sync::Mutex<LinkWriter>>, logbook: Arc<Mutex<Logbook>>) -> Self {
        let (stop_tx, _) = watch::channel(false);
        Self {
            stop_tx,
            writer,
            logbook,
            fired: AtomicBool::new(false),
        }
    }

    /// Stop signal for a worker; polled at the top of every loop iteration
    pub fn stop_signal(&self) -> watch::Receiver<bool> {
        self.stop_tx.subscribe()
    }

    /// Ask both workers to stop without running the shutdown sequence
    pub fn request_stop(&self) {
        let _ = self.stop_tx.send(true);
    }

    /// Whether the shutdown sequence has already run
    pub fn is_shut_down(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    /// Run the shutdown sequence once.
    ///
    /// Later invocations are no-ops: exactly one fail-safe message is ever
    /// sent, and nothing here panics or returns an error.
    pub async fn shutdown(&self) {
        if self.fired.swap(true, Ordering::SeqCst) {
            debug!("shutdown already performed");
            return;
        }
        info!("shutting down blind-spot monitor");

        self.request_stop();

        // Fail-safe: de-assert any device alert before going silent.
        {
            let mut writer = self.writer.lock().await;
            if let Err(e) = writer.send_risk(RiskLevel::None).await {
                warn!("fail-safe message failed: {}", e);
            } else if let Err(e) = writer.flush().await {
                warn!("final flush failed: {}", e);
            }
        }
        // Let the device consume the final line.
        tokio::time::sleep(SETTLE_DELAY).await;

        {
            let mut logbook = self.logbook.lock().unwrap_or_else(PoisonError::into_inner);
            if let Err(e) = logbook.close() {
                warn!("failed to close telemetry log: {}", e);
            }
        }

        info!("shutdown complete");
    }
}

/// Supervise both workers until the operator stops the process or one of
/// them terminates, then shut down and wait for both to have observably
/// stopped.
pub async fn supervise(
    lifecycle: Lifecycle,
    vision: JoinHandle<Result<(), MonitorError>>,
    telemetry: JoinHandle<Result<(), MonitorError>>,
) -> Result<(), MonitorError> {
    let mut vision = vision;
    let mut telemetry = telemetry;
    let mut vision_result: Option<WorkerResult> = None;
    let mut telemetry_result: Option<WorkerResult> = None;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => info!("stop requested by operator"),
        res = &mut vision => vision_result = Some(res),
        res = &mut telemetry => telemetry_result = Some(res),
    }

    // Stop the still-running worker before the fail-safe goes out, so the
    // NONE message is the last line on the wire.
    lifecycle.request_stop();
    let vision_result = drain("vision", vision_result, vision).await;
    let telemetry_result = drain("telemetry", telemetry_result, telemetry).await;

    lifecycle.shutdown().await;

    let failure = outcome("vision", vision_result).or(outcome("telemetry", telemetry_result));
    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

async fn drain(
    name: &str,
    done: Option<WorkerResult>,
    handle: JoinHandle<Result<(), MonitorError>>,
) -> Option<WorkerResult> {
    if done.is_some() {
        return done;
    }
    match tokio::time::timeout(DRAIN_TIMEOUT, handle).await {
        Ok(result) => Some(result),
        Err(_) => {
            warn!("{} worker did not stop within {:?}", name, DRAIN_TIMEOUT);
            None
        }
    }
}

fn outcome(name: &str, result: Option<WorkerResult>) -> Option<MonitorError> {
    match result {
        Some(Ok(Ok(()))) => {
            info!("{} worker exited cleanly", name);
            None
        }
        Some(Ok(Err(e))) => {
            error!("{} worker failed: {}", name, e);
            Some(e)
        }
        Some(Err(e)) => {
            error!("{} worker panicked: {}", name, e);
            Some(MonitorError::Panic(e.to_string()))
        }
        None => None,
    }
}
