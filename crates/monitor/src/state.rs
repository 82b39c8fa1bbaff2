//! Monitor state tracking

use serde::{Deserialize, Serialize};

/// Blink classifier phase for the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlinkPhase {
    #[default]
    Open,
    Closing,
    /// No face or unreliable EAR this frame
    NoSignal,
    /// Classification frozen by the rest policy
    Suspended,
}

/// Eye closure state (owned by the blink classifier)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EyeState {
    /// Consecutive frames with EAR below threshold
    pub closed_frame_count: u32,

    /// Timestamp of the first closed frame of the current closure
    pub closure_start_time: Option<f64>,

    /// Blinks counted this session
    pub total_blinks: u64,

    /// Consecutive frames without a usable EAR
    pub signal_gap_frames: u32,
}

impl EyeState {
    /// Seconds since the current closure started
    pub fn closure_seconds(&self, now: f64) -> f64 {
        self.closure_start_time
            .map_or(0.0, |start| (now - start).max(0.0))
    }

    pub fn is_closed(&self) -> bool {
        self.closed_frame_count > 0
    }
}

/// Sustained-closure alert
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrowsinessState {
    pub is_alert: bool,
}

/// Mouth opening state (owned by the yawn detector)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YawnState {
    /// Consecutive frames with MAR above threshold
    pub open_frame_count: u32,

    /// Yawns counted this session
    pub total_yawns: u64,
}

/// Proximity classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProximityStatus {
    Safe,
    TooClose,
    /// No face or an invalid distance this frame
    #[default]
    NoReading,
    /// No valid calibration; distance is unavailable
    Uncalibrated,
}

/// Camera proximity state
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProximityState {
    /// Estimated distance; 0 when there is no reading
    pub current_distance_cm: f64,
    pub status: ProximityStatus,
}

impl ProximityState {
    pub fn is_too_close(&self) -> bool {
        self.status == ProximityStatus::TooClose
    }

    /// Whether the distance is a real measurement
    pub fn has_reading(&self) -> bool {
        matches!(self.status, ProximityStatus::Safe | ProximityStatus::TooClose)
    }
}

/// Work/rest timer phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RestPhase {
    #[default]
    Working,
    Resting,
}

/// Work/rest timer state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RestCycleState {
    pub phase: RestPhase,

    /// Timestamp the current phase started
    pub phase_start_time: f64,

    /// Rest breaks that ran to completion
    pub cycles_completed: u64,

    /// Rest breaks that came due
    pub cycles_scheduled: u64,
}
