//! Detected objects and the detection source contract

use crate::evaluate::RiskLevel;
use crate::geometry::BoundingBox;
use crate::EvalError;
use camera_source::VideoFrame;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::info;

/// Object class derived from a detection label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectClass {
    Person,
    Car,
    Motorcycle,
    Bus,
    Truck,
    Unknown,
}

impl ObjectClass {
    /// Map an open-ended label to a known class.
    ///
    /// The vocabulary follows common detection models; anything outside it
    /// is `Unknown` and carries no risk weight.
    pub fn from_label(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "person" => ObjectClass::Person,
            "car" => ObjectClass::Car,
            "motorcycle" | "motorbike" => ObjectClass::Motorcycle,
            "bus" => ObjectClass::Bus,
            "truck" => ObjectClass::Truck,
            _ => ObjectClass::Unknown,
        }
    }

    /// Severity contributed by this class when it enters the monitored region
    pub fn severity(&self) -> RiskLevel {
        match self {
            ObjectClass::Person => RiskLevel::High,
            ObjectClass::Car | ObjectClass::Motorcycle | ObjectClass::Bus | ObjectClass::Truck => {
                RiskLevel::Low
            }
            ObjectClass::Unknown => RiskLevel::None,
        }
    }
}

/// One observed object in a frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    /// Model-reported label
    pub label: String,
    /// Bounding box in frame pixel coordinates
    pub bbox: BoundingBox,
}

impl Detection {
    /// Create a detection from a label and box corners
    pub fn new(label: impl Into<String>, x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self {
            label: label.into(),
            bbox: BoundingBox::new(x1, y1, x2, y2),
        }
    }

    /// Class derived from the label
    pub fn class(&self) -> ObjectClass {
        ObjectClass::from_label(&self.label)
    }
}

/// Detector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Detection confidence threshold
    pub confidence_threshold: f32,
    /// Model path
    pub model_path: Option<String>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.5,
            model_path: None,
        }
    }
}

/// Black-box detection source: frame in, detected objects out.
///
/// Inference latency is variable and dominates the vision loop; callers
/// must not assume any per-call time bound.
pub trait Detector: Send {
    fn detect(&mut self, frame: &VideoFrame) -> Result<Vec<Detection>, EvalError>;
}

/// Object detector backed by an external model
pub struct ObjectDetector {
    config: DetectorConfig,
}

impl ObjectDetector {
    pub fn new(config: DetectorConfig) -> Result<Self, EvalError> {
        info!(
            "creating object detector (confidence threshold {})",
            config.confidence_threshold
        );
        Ok(Self { config })
    }

    /// Configured confidence threshold
    pub fn confidence_threshold(&self) -> f32 {
        self.config.confidence_threshold
    }
}

impl Detector for ObjectDetector {
    fn detect(&mut self, _frame: &VideoFrame) -> Result<Vec<Detection>, EvalError> {
        // Real implementation would:
        // 1. Preprocess the frame for the model
        // 2. Run inference
        // 3. NMS and confidence filtering against self.config
        // 4. Map class indices back to labels
        Ok(Vec::new())
    }
}

/// Detector replaying scripted per-frame detections.
///
/// Returns each queued detection list once, then empty lists.
pub struct ScriptedDetector {
    script: VecDeque<Vec<Detection>>,
}

impl ScriptedDetector {
    pub fn new(script: Vec<Vec<Detection>>) -> Self {
        Self {
            script: script.into(),
        }
    }
}

impl Detector for ScriptedDetector {
    fn detect(&mut self, _frame: &VideoFrame) -> Result<Vec<Detection>, EvalError> {
        Ok(self.script.pop_front().unwrap_or_default())
    }
}
