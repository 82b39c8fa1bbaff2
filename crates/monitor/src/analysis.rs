//! Per-frame analysis results and alerts

use serde::{Deserialize, Serialize};

use crate::rest::RestTransition;
use crate::state::{BlinkPhase, ProximityStatus, RestPhase};

/// Monitor alert types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonitorAlert {
    /// Eyes closed for the drowsiness duration
    Drowsiness,

    /// Face closer than the safe viewing distance
    TooClose,

    /// No face for several consecutive frames (camera blocked?)
    FaceNotVisible,

    /// Rest break in progress
    RestDue,

    /// Yawn completed this frame
    Yawning,
}

/// Complete analysis of one frame
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameAnalysis {
    pub timestamp_s: f64,

    /// Seconds since the previous frame; 0 for the first frame
    pub frame_interval_s: f64,

    pub face_detected: bool,

    /// Mean eye aspect ratio when both eyes were measurable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ear: Option<f64>,

    /// Mouth aspect ratio when measurable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mar: Option<f64>,

    /// Estimated camera distance when calibrated and measurable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_cm: Option<f64>,

    pub blink_phase: BlinkPhase,

    /// A blink completed on this frame
    pub is_blink_event: bool,

    pub is_drowsy: bool,

    /// A yawn completed on this frame
    pub is_yawn_event: bool,

    pub proximity: ProximityStatus,

    pub is_too_close: bool,

    pub rest_phase: RestPhase,

    /// Seconds left in the current work or rest phase
    pub rest_remaining_s: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rest_transition: Option<RestTransition>,

    /// Active alerts
    pub alerts: Vec<MonitorAlert>,
}

impl FrameAnalysis {
    /// Check if any alerts are active
    pub fn has_alerts(&self) -> bool {
        !self.alerts.is_empty()
    }

    /// Get highest severity alert
    pub fn highest_severity_alert(&self) -> Option<MonitorAlert> {
        const PRIORITY: [MonitorAlert; 5] = [
            MonitorAlert::Drowsiness,
            MonitorAlert::TooClose,
            MonitorAlert::FaceNotVisible,
            MonitorAlert::RestDue,
            MonitorAlert::Yawning,
        ];
        PRIORITY
            .into_iter()
            .find(|alert| self.alerts.contains(alert))
    }

    /// Whether the distance was a real measurement this frame
    pub fn has_distance(&self) -> bool {
        matches!(self.proximity, ProximityStatus::Safe | ProximityStatus::TooClose)
    }
}
