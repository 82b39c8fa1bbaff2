//! Monitor configuration

use serde::{Deserialize, Serialize};

use crate::MonitorError;

/// Whether eye classification keeps running during a rest break
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestPolicy {
    /// No blink counting, yawn counting or drowsiness evaluation while resting
    #[default]
    FreezeClassification,
    /// Classify as usual while resting
    ContinueClassification,
}

/// Work/rest cycle timing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RestConfig {
    /// Working time before a rest break is due (seconds)
    pub work_interval_sec: f64,

    /// Length of the rest break (seconds)
    pub rest_duration_sec: f64,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            work_interval_sec: 20.0 * 60.0,
            rest_duration_sec: 20.0,
        }
    }
}

/// Monitor configuration
///
/// Frame counts are expressed at `reference_fps` and rescaled to the
/// observed frame rate when `adaptive_frame_timing` is on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// EAR below this counts as a closed eye
    pub ear_threshold: f64,

    /// MAR above this counts as an open mouth
    pub mar_threshold: f64,

    /// Shortest closure counted as a blink (frames)
    pub min_blink_frames: u32,

    /// Closure length that raises the drowsiness alert (frames)
    pub drowsy_frames: u32,

    /// Shortest mouth opening counted as a yawn (frames)
    pub min_yawn_frames: u32,

    /// Frame rate the frame counts above were tuned for
    pub reference_fps: f64,

    /// Rescale frame counts to the observed frame rate
    pub adaptive_frame_timing: bool,

    /// Consecutive no-signal frames after which an open closure is dropped
    pub signal_loss_reset_frames: u32,

    /// Consecutive face-less frames before the face-not-visible alert
    pub face_absent_alert_frames: u32,

    /// Closer than this is too close (centimeters)
    pub distance_threshold_cm: f64,

    /// Face width used when the calibration does not carry one (centimeters)
    pub known_face_width_cm: f64,

    /// Work/rest timer
    pub rest: RestConfig,

    /// Classification behaviour during rest breaks
    pub rest_policy: RestPolicy,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            ear_threshold: 0.25,
            mar_threshold: 0.70,
            min_blink_frames: 3,
            drowsy_frames: 45,
            min_yawn_frames: 10,
            reference_fps: 30.0,
            adaptive_frame_timing: true,
            signal_loss_reset_frames: 15,
            face_absent_alert_frames: 30,
            distance_threshold_cm: 45.0,
            known_face_width_cm: 14.0,
            rest: RestConfig::default(),
            rest_policy: RestPolicy::default(),
        }
    }
}

impl MonitorConfig {
    /// Create strict config (earlier drowsiness alert, larger safe distance)
    pub fn strict() -> Self {
        Self {
            ear_threshold: 0.28,
            drowsy_frames: 30,
            distance_threshold_cm: 50.0,
            ..Default::default()
        }
    }

    /// Create lenient config (later drowsiness alert, smaller safe distance)
    pub fn lenient() -> Self {
        Self {
            drowsy_frames: 90,
            distance_threshold_cm: 40.0,
            ..Default::default()
        }
    }

    /// Check that thresholds are usable
    pub fn validate(&self) -> Result<(), MonitorError> {
        fn positive(name: &str, value: f64) -> Result<(), MonitorError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(MonitorError::Config(format!("{} must be positive, got {}", name, value)))
            }
        }

        positive("ear_threshold", self.ear_threshold)?;
        positive("mar_threshold", self.mar_threshold)?;
        positive("reference_fps", self.reference_fps)?;
        positive("distance_threshold_cm", self.distance_threshold_cm)?;
        positive("known_face_width_cm", self.known_face_width_cm)?;
        positive("rest.work_interval_sec", self.rest.work_interval_sec)?;
        positive("rest.rest_duration_sec", self.rest.rest_duration_sec)?;

        if self.min_blink_frames == 0 {
            return Err(MonitorError::Config("min_blink_frames must be at least 1".into()));
        }
        if self.drowsy_frames <= self.min_blink_frames {
            return Err(MonitorError::Config(format!(
                "drowsy_frames ({}) must exceed min_blink_frames ({})",
                self.drowsy_frames, self.min_blink_frames
            )));
        }
        if self.min_yawn_frames == 0 {
            return Err(MonitorError::Config("min_yawn_frames must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        assert!(MonitorConfig::default().validate().is_ok());
        assert!(MonitorConfig::strict().validate().is_ok());
        assert!(MonitorConfig::lenient().validate().is_ok());
    }

    #[test]
    fn test_drowsy_must_exceed_blink_window() {
        let config = MonitorConfig {
            min_blink_frames: 10,
            drowsy_frames: 10,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(MonitorError::Config(_))));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: MonitorConfig =
            serde_json::from_str(r#"{"ear_threshold": 0.2, "rest_policy": "continue_classification"}"#)
                .unwrap();
        assert_eq!(config.ear_threshold, 0.2);
        assert_eq!(config.drowsy_frames, 45);
        assert_eq!(config.rest_policy, RestPolicy::ContinueClassification);
    }
}
