//! Facial Geometry Metrics
//!
//! Stateless formulas over landmark coordinates:
//! - Eye Aspect Ratio (EAR) for closure detection
//! - Mouth Aspect Ratio (MAR) for yawn detection
//! - Pinhole-camera distance and focal length
//!
//! Degenerate geometry never errors; it yields a zero `Reading` flagged as
//! unreliable.

mod distance;
mod ratios;
mod stats;

pub use distance::{distance_cm, focal_length, pixel_span};
pub use ratios::{eye_aspect_ratio, mean_eye_aspect_ratio, mouth_aspect_ratio};
pub use stats::median;

use serde::{Deserialize, Serialize};

/// A computed value plus whether the input geometry supported it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub value: f64,
    pub reliable: bool,
}

impl Reading {
    pub fn valid(value: f64) -> Self {
        Self {
            value,
            reliable: true,
        }
    }

    /// Zero value flagged as unreliable
    pub fn unreliable() -> Self {
        Self {
            value: 0.0,
            reliable: false,
        }
    }

    /// Value if reliable
    pub fn get(&self) -> Option<f64> {
        self.reliable.then_some(self.value)
    }
}
