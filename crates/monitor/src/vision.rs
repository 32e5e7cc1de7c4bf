//! Vision worker
//!
//! Pulls frames, runs detection, classifies risk, publishes it, and sends
//! the per-frame heartbeat. Owns all normal outbound traffic on the link.

use crate::display::DisplayHandle;
use crate::state::RiskState;
use crate::MonitorError;
use camera_source::FrameSource;
use risk_eval::{evaluate, Detector, Roi};
use std::sync::Arc;
use telemetry_link::LinkWriter;
use tokio::sync::{watch, Mutex};
use tracing::{debug, error, info};

/// The detection half of the risk-fusion loop
pub struct VisionWorker {
    source: Box<dyn FrameSource>,
    detector: Box<dyn Detector>,
    roi: Roi,
    state: RiskState,
    writer: Arc<Mutex<LinkWriter>>,
    display: DisplayHandle,
    stop: watch::Receiver<bool>,
}

impl VisionWorker {
    pub fn new(
        source: Box<dyn FrameSource>,
        detector: Box<dyn Detector>,
        roi: Roi,
        state: RiskState,
        writer: Arc<Mutex<LinkWriter>>,
        display: DisplayHandle,
        stop: watch::Receiver<bool>,
    ) -> Self {
        Self {
            source,
            detector,
            roi,
            state,
            writer,
            display,
            stop,
        }
    }

    /// Run until the source is exhausted, the link fails, or a stop is
    /// requested. The stop signal is polled every iteration so shutdown
    /// latency is bounded by one frame.
    pub async fn run(mut self) -> Result<(), MonitorError> {
        info!("vision worker started");

        loop {
            if *self.stop.borrow() {
                break;
            }

            let frame = match self.source.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    info!("frame source exhausted, vision worker finishing");
                    break;
                }
                Err(e) => {
                    error!("frame capture failed: {}", e);
                    return Err(e.into());
                }
            };

            // Dominant latency of the loop; may take arbitrarily long.
            let detections = self.detector.detect(&frame)?;
            let level = evaluate(&detections, &self.roi);
            debug!(
                sequence = frame.sequence,
                detections = detections.len(),
                risk = %level,
                "frame evaluated"
            );

            self.state.publish(level);

            // Heartbeat on every frame, changed or not; the device expects
            // a steady stream, not edge-triggered updates.
            self.writer.lock().await.send_risk(level).await?;

            self.display.set_risk(level);
        }

        info!("vision worker stopped");
        Ok(())
    }
}
