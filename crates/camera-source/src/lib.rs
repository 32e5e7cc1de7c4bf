//! Frame Acquisition for the Blind-Spot Monitor
//!
//! Provides the frame source contract consumed by the vision worker:
//! - `VideoFrame`: one decoded RGB frame with capture metadata
//! - `FrameSource`: pull-based source of sequential frames
//! - `SyntheticSource`: deterministic in-process source for tests and
//!   hardware-free operation
//!
//! Camera drivers and codecs live behind this boundary; the rest of the
//! pipeline only ever sees `VideoFrame` values.

pub mod frame;
pub mod source;

pub use frame::VideoFrame;
pub use source::{FrameSource, SourceConfig, SyntheticSource};

use thiserror::Error;

/// Frame source error types
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("failed to open frame source: {0}")]
    Open(String),

    #[error("capture failed: {0}")]
    Capture(String),

    #[error("invalid frame format: {0}")]
    Format(String),
}
