//! Yawn detection from the mouth aspect ratio

use tracing::debug;

use crate::state::YawnState;
use crate::timing::FrameThresholds;

/// Counts sustained mouth openings
#[derive(Debug, Clone)]
pub struct YawnDetector {
    mar_threshold: f64,
    state: YawnState,
}

impl YawnDetector {
    pub fn new(mar_threshold: f64) -> Self {
        Self {
            mar_threshold,
            state: YawnState::default(),
        }
    }

    /// Feed one frame's MAR; returns true when a yawn completed this frame
    ///
    /// Frames without a usable MAR leave the state untouched.
    pub fn update(&mut self, mar: Option<f64>, thresholds: &FrameThresholds) -> bool {
        let Some(mar) = mar else {
            return false;
        };

        if mar > self.mar_threshold {
            self.state.open_frame_count += 1;
            return false;
        }

        let yawned = self.state.open_frame_count >= thresholds.min_yawn_frames;
        if yawned {
            self.state.total_yawns += 1;
            debug!(
                "Yawn #{} after {} open frames",
                self.state.total_yawns, self.state.open_frame_count
            );
        }
        self.state.open_frame_count = 0;
        yawned
    }

    /// Abandon an in-progress mouth opening
    pub fn discard(&mut self) {
        self.state.open_frame_count = 0;
    }

    pub fn state(&self) -> &YawnState {
        &self.state
    }

    pub fn total_yawns(&self) -> u64 {
        self.state.total_yawns
    }

    pub fn reset(&mut self) {
        self.state = YawnState::default();
    }
}
