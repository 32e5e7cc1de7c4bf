//! Frame source contract and synthetic implementation

use crate::frame::VideoFrame;
use crate::SourceError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

/// Frame source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Capture width
    pub width: u32,
    /// Capture height
    pub height: u32,
    /// Interval between frames (ms); 0 disables pacing
    pub frame_interval_ms: u64,
    /// Number of frames before the source reports exhaustion
    pub frame_count: u32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            frame_interval_ms: 33,
            frame_count: 300,
        }
    }
}

/// Pull-based source of sequential frames.
///
/// `Ok(None)` signals normal exhaustion; the caller treats it as a clean
/// termination, not a failure.
pub trait FrameSource: Send {
    fn next_frame(&mut self) -> Result<Option<VideoFrame>, SourceError>;
}

/// Deterministic frame source producing blank frames at a fixed pace.
///
/// Stands in for camera hardware during tests and bench-top runs.
pub struct SyntheticSource {
    config: SourceConfig,
    produced: u32,
}

impl SyntheticSource {
    /// Create a synthetic source from configuration
    pub fn new(config: SourceConfig) -> Self {
        info!(
            "creating synthetic frame source: {}x{}, {} frames",
            config.width, config.height, config.frame_count
        );
        Self {
            config,
            produced: 0,
        }
    }

    /// Create an unpaced source producing `frame_count` frames (for tests)
    pub fn with_frame_count(frame_count: u32) -> Self {
        Self::new(SourceConfig {
            frame_interval_ms: 0,
            frame_count,
            ..SourceConfig::default()
        })
    }
}

impl FrameSource for SyntheticSource {
    fn next_frame(&mut self) -> Result<Option<VideoFrame>, SourceError> {
        if self.produced >= self.config.frame_count {
            return Ok(None);
        }

        if self.config.frame_interval_ms > 0 {
            std::thread::sleep(Duration::from_millis(self.config.frame_interval_ms));
        }

        let timestamp_ms = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        let sequence = self.produced;
        self.produced += 1;

        Ok(Some(VideoFrame::blank(
            self.config.width,
            self.config.height,
            timestamp_ms,
            sequence,
        )))
    }
}
