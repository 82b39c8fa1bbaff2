//! Camera Calibration
//!
//! Derives the camera focal length from face-width samples taken at a known
//! distance, and persists it for the distance estimator.

mod calibrator;
mod config;
mod record;

pub use calibrator::Calibrator;
pub use config::CalibrationConfig;
pub use record::{load_or_uncalibrated, CalibrationRecord};

use std::path::PathBuf;
use thiserror::Error;

/// Calibration errors
#[derive(Debug, Error)]
pub enum CalibrationError {
    #[error("Need at least {required} face-width samples, collected {collected}")]
    InsufficientSamples { collected: usize, required: usize },

    #[error("Invalid calibration record: {0}")]
    InvalidRecord(String),

    #[error("Calibration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Calibration file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Calibration file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
