//! Landmark frame types

use serde::{Deserialize, Serialize};

/// 2D point in pixel coordinates of the current frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Landmarks reported by the detector for one captured instant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LandmarkFrame {
    /// Capture timestamp (wall clock, seconds)
    pub timestamp_s: f64,

    /// Frame sequence number
    #[serde(default)]
    pub sequence: u64,

    /// Ordered landmark points; empty when no face was found
    #[serde(default)]
    pub points: Vec<Point>,
}

impl LandmarkFrame {
    /// Create a frame with a detected face
    pub fn new(timestamp_s: f64, sequence: u64, points: Vec<Point>) -> Self {
        Self {
            timestamp_s,
            sequence,
            points,
        }
    }

    /// Create a frame in which the detector found no face
    pub fn empty(timestamp_s: f64, sequence: u64) -> Self {
        Self {
            timestamp_s,
            sequence,
            points: Vec::new(),
        }
    }

    /// Whether the detector reported a face
    pub fn face_detected(&self) -> bool {
        !self.points.is_empty()
    }

    /// Get the landmark at `index`
    pub fn get(&self, index: usize) -> Option<Point> {
        self.points.get(index).copied()
    }

    /// Number of landmarks in the frame
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
