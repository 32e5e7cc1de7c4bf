//! Bounding boxes and the monitored region

use crate::EvalError;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in frame pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl BoundingBox {
    /// Create a bounding box from corner coordinates
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Strict rectangle intersection test.
    ///
    /// Rectangles that merely share an edge (zero-area overlap) do not
    /// count as overlapping; the inequalities are strict on both axes.
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        self.x1 < other.x2 && other.x1 < self.x2 && self.y1 < other.y2 && other.y1 < self.y2
    }
}

/// Fixed region of interest in frame coordinates.
///
/// Configured once at startup and immutable for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Roi {
    rect: BoundingBox,
}

impl Roi {
    /// Create a validated region of interest (x1 < x2 and y1 < y2)
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Result<Self, EvalError> {
        if x1 >= x2 || y1 >= y2 {
            return Err(EvalError::InvalidRoi(format!(
                "degenerate rectangle ({x1},{y1})-({x2},{y2})"
            )));
        }
        Ok(Self {
            rect: BoundingBox::new(x1, y1, x2, y2),
        })
    }

    /// The region's rectangle
    pub fn rect(&self) -> &BoundingBox {
        &self.rect
    }
}
