//! Blind-Spot Risk Evaluation
//!
//! Classifies per-frame object detections against a fixed region of
//! interest:
//! - geometry: bounding boxes and the monitored region
//! - detection: detected objects, label classes, and the detector contract
//! - evaluate: the pure risk classification function
//!
//! Evaluation is deterministic and stateless; each frame is scored on its
//! own, with no memory of prior frames.

pub mod detection;
pub mod evaluate;
pub mod geometry;

pub use detection::{Detection, Detector, DetectorConfig, ObjectClass, ObjectDetector, ScriptedDetector};
pub use evaluate::{evaluate, RiskLevel};
pub use geometry::{BoundingBox, Roi};

use thiserror::Error;

/// Risk evaluation error types
#[derive(Error, Debug)]
pub enum EvalError {
    #[error("invalid region of interest: {0}")]
    InvalidRoi(String),

    #[error("model loading failed: {0}")]
    ModelLoad(String),

    #[error("inference failed: {0}")]
    Inference(String),
}
