//! Video frame type

/// Decoded RGB video frame
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// RGB pixel data (width * height * 3)
    pub data: Vec<u8>,
    /// Frame width
    pub width: u32,
    /// Frame height
    pub height: u32,
    /// Capture timestamp (Unix ms)
    pub timestamp_ms: u64,
    /// Frame sequence number
    pub sequence: u32,
}

impl VideoFrame {
    /// Create a new video frame from raw RGB data
    pub fn new(data: Vec<u8>, width: u32, height: u32, timestamp_ms: u64, sequence: u32) -> Self {
        Self {
            data,
            width,
            height,
            timestamp_ms,
            sequence,
        }
    }

    /// Create a black frame of the given dimensions
    pub fn blank(width: u32, height: u32, timestamp_ms: u64, sequence: u32) -> Self {
        Self::new(
            vec![0u8; (width * height * 3) as usize],
            width,
            height,
            timestamp_ms,
            sequence,
        )
    }

    /// Number of pixels in the frame
    pub fn pixel_count(&self) -> usize {
        (self.width * self.height) as usize
    }
}
