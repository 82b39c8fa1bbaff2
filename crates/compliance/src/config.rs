//! Aggregation and report configuration

use serde::{Deserialize, Serialize};

/// Record emission settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplianceConfig {
    /// Window length between records (seconds)
    pub logging_interval_sec: f64,
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        Self {
            logging_interval_sec: 15.0,
        }
    }
}

/// Log review settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Window length the records were written with (seconds)
    pub logging_interval_sec: f64,

    /// Weight of distance compliance in the combined score
    pub distance_weight: f64,

    /// Weight of rest compliance in the combined score
    pub rest_weight: f64,

    /// Blink-rate z-score below this flags a record
    pub low_blink_z: f64,

    /// Drowsy-time z-score above this flags a record
    pub high_drowsy_z: f64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            logging_interval_sec: 15.0,
            distance_weight: 0.6,
            rest_weight: 0.4,
            low_blink_z: -1.5,
            high_drowsy_z: 1.8,
        }
    }
}

impl ReportConfig {
    /// Create strict config (flags smaller deviations)
    pub fn strict() -> Self {
        Self {
            low_blink_z: -1.0,
            high_drowsy_z: 1.2,
            ..Default::default()
        }
    }

    /// Create lenient config (flags only large deviations)
    pub fn lenient() -> Self {
        Self {
            low_blink_z: -2.0,
            high_drowsy_z: 2.0,
            ..Default::default()
        }
    }
}
