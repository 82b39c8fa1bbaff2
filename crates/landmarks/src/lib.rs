//! Landmark Input Boundary
//!
//! Defines what the external face-landmark detector hands to the monitor:
//! - One ordered point set per captured frame (pixel coordinates)
//! - Index layouts selecting eyes, mouth and face-width anchors
//! - A replay source reading frames from JSON lines

pub mod frame;
pub mod layout;
pub mod source;

pub use frame::{LandmarkFrame, Point};
pub use layout::{FaceLandmarks, LandmarkLayout, LayoutKind};
pub use source::{FrameSource, JsonLinesSource};

use thiserror::Error;

/// Landmark input error types
#[derive(Error, Debug)]
pub enum LandmarkError {
    #[error("Failed to open landmark source: {0}")]
    Open(String),

    #[error("Malformed frame on line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("Landmark index {index} out of range for frame with {len} points")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Read failed: {0}")]
    Io(#[from] std::io::Error),
}
