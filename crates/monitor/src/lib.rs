//! Blind-Spot Monitor Orchestration
//!
//! Wires the pipeline together and runs it:
//! - vision worker: frames -> detections -> risk -> heartbeat
//! - telemetry worker: device status lines -> display + logbook
//! - lifecycle controller: startup, stop signal, fail-safe shutdown
//!
//! The two workers run concurrently and share nothing but the risk state
//! (single writer) and the outbound link writer (lock-guarded).

pub mod config;
pub mod display;
pub mod lifecycle;
pub mod state;
pub mod telemetry;
pub mod vision;

pub use self::config::MonitorConfig;
pub use display::{display_channel, run_headless_display, DisplayHandle, DisplayUpdate};
pub use lifecycle::{supervise, Lifecycle};
pub use state::{RiskSnapshot, RiskState};
pub use telemetry::TelemetryWorker;
pub use vision::VisionWorker;

use camera_source::{SourceError, SyntheticSource};
use logbook::{LogError, Logbook};
use risk_eval::{EvalError, ObjectDetector};
use std::sync::Arc;
use telemetry_link::LinkError;
use thiserror::Error;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Top-level monitor errors
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("telemetry link error: {0}")]
    Link(#[from] LinkError),

    #[error("frame source error: {0}")]
    Source(#[from] SourceError),

    #[error("risk evaluation error: {0}")]
    Eval(#[from] EvalError),

    #[error("telemetry log error: {0}")]
    Log(#[from] LogError),

    #[error("configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("worker panicked: {0}")]
    Panic(String),
}

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("failed to set tracing subscriber");
}

/// Build the pipeline from configuration and run it until the operator
/// stops it or a worker terminates.
pub async fn run(config: MonitorConfig) -> Result<(), MonitorError> {
    let roi = config.roi.to_roi()?;

    let (reader, writer) = if config.serial.is_mock() {
        telemetry_link::open_mock()
    } else {
        telemetry_link::open_serial(&config.serial.device, config.serial.baud_rate)?
    };
    let writer = Arc::new(tokio::sync::Mutex::new(writer));
    let logbook = Arc::new(std::sync::Mutex::new(Logbook::create(&config.log_path)?));

    let (display, display_rx) = display_channel(config.display_queue_depth);
    tokio::spawn(run_headless_display(display_rx));

    let state = RiskState::new();
    let lifecycle = Lifecycle::new(writer.clone(), logbook.clone());

    let vision = VisionWorker::new(
        Box::new(SyntheticSource::new(config.source.clone())),
        Box::new(ObjectDetector::new(config.detector.clone())?),
        roi,
        state,
        writer,
        display.clone(),
        lifecycle.stop_signal(),
    );
    let telemetry = TelemetryWorker::new(
        reader,
        display,
        logbook,
        config.serial.read_timeout(),
        lifecycle.stop_signal(),
    );

    let vision_handle = tokio::spawn(vision.run());
    let telemetry_handle = tokio::spawn(telemetry.run());

    supervise(lifecycle, vision_handle, telemetry_handle).await
}
