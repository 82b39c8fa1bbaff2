//! Calibration configuration

use serde::{Deserialize, Serialize};

/// Calibration configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Distance the operator sits from the camera while sampling (cm)
    pub known_distance_cm: f64,

    /// Physical face width between the two anchors (cm)
    pub known_face_width_cm: f64,

    /// Pixel widths at or below this are spurious detections
    pub min_pixel_width: f64,

    /// Samples required before calibration may complete
    pub min_samples: usize,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            known_distance_cm: 60.0,
            known_face_width_cm: 14.0,
            min_pixel_width: 50.0,
            min_samples: 10,
        }
    }
}
