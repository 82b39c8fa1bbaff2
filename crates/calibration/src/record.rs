//! Persisted calibration record

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::CalibrationError;

/// Calibration file contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationRecord {
    /// Camera focal length in pixels; strictly positive
    #[serde(alias = "FocalLength")]
    pub focal_length: f64,

    #[serde(default)]
    pub known_distance_cm: f64,

    #[serde(default)]
    pub known_face_width_cm: f64,

    /// Unix time (seconds) the calibration was taken
    #[serde(default)]
    pub calibration_timestamp: f64,
}

impl CalibrationRecord {
    /// Reject records that cannot drive the distance estimator
    pub fn validate(&self) -> Result<(), CalibrationError> {
        if !self.focal_length.is_finite() || self.focal_length <= 0.0 {
            return Err(CalibrationError::InvalidRecord(format!(
                "focal_length must be positive, got {}",
                self.focal_length
            )));
        }
        Ok(())
    }

    /// Load and validate a calibration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CalibrationError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CalibrationError::NotFound(path.to_path_buf()));
        }

        let text = fs::read_to_string(path)?;
        let record: CalibrationRecord = serde_json::from_str(&text)?;
        record.validate()?;
        Ok(record)
    }

    /// Write the record, replacing any previous calibration
    ///
    /// The file is written beside the target and renamed into place.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), CalibrationError> {
        self.validate()?;

        let path = path.as_ref();
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)?;

        info!("Calibration saved to {}", path.display());
        Ok(())
    }
}

/// Load the calibration, falling back to uncalibrated mode
///
/// A missing or invalid file is logged and yields `None`; it never aborts
/// the session and never substitutes a default focal length.
pub fn load_or_uncalibrated(path: impl AsRef<Path>) -> Option<CalibrationRecord> {
    let path = path.as_ref();
    match CalibrationRecord::load(path) {
        Ok(record) => {
            info!(
                "Loaded focal length {:.2}px from {}",
                record.focal_length,
                path.display()
            );
            Some(record)
        }
        Err(e) => {
            warn!("Running uncalibrated, distance alerts unavailable: {}", e);
            None
        }
    }
}
