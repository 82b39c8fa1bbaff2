//! Blink classification and drowsiness derivation
//!
//! The classifier is a hysteresis state machine over per-frame EAR values:
//! a closure counts as a blink on reopening only if it lasted at least
//! `min_blink_frames` and fewer than `drowsy_frames`. Shorter closures are
//! sensor noise; longer ones are drowsiness episodes.

use tracing::{debug, info};

use crate::state::{BlinkPhase, DrowsinessState, EyeState};
use crate::timing::FrameThresholds;

/// Result of one classifier step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlinkUpdate {
    /// A blink completed on this frame
    pub blink: bool,
    pub phase: BlinkPhase,
}

impl BlinkUpdate {
    pub fn suspended() -> Self {
        Self {
            blink: false,
            phase: BlinkPhase::Suspended,
        }
    }
}

/// Per-frame blink state machine
#[derive(Debug, Clone)]
pub struct BlinkClassifier {
    ear_threshold: f64,
    signal_loss_reset_frames: u32,
    state: EyeState,
}

impl BlinkClassifier {
    pub fn new(ear_threshold: f64, signal_loss_reset_frames: u32) -> Self {
        Self {
            ear_threshold,
            signal_loss_reset_frames,
            state: EyeState::default(),
        }
    }

    /// Feed one frame's EAR; `None` means no usable signal this frame
    pub fn update(
        &mut self,
        ear: Option<f64>,
        timestamp: f64,
        thresholds: &FrameThresholds,
    ) -> BlinkUpdate {
        let Some(ear) = ear else {
            return self.no_signal();
        };
        self.state.signal_gap_frames = 0;

        if ear < self.ear_threshold {
            if self.state.closed_frame_count == 0 {
                self.state.closure_start_time = Some(timestamp);
            }
            self.state.closed_frame_count += 1;
            return BlinkUpdate {
                blink: false,
                phase: BlinkPhase::Closing,
            };
        }

        let closed = self.state.closed_frame_count;
        let blink = closed >= thresholds.min_blink_frames && closed < thresholds.drowsy_frames;
        if blink {
            self.state.total_blinks += 1;
            debug!(
                "Blink #{} after {} closed frames ({:.3}s)",
                self.state.total_blinks,
                closed,
                self.state.closure_seconds(timestamp)
            );
        }
        self.clear_closure();

        BlinkUpdate {
            blink,
            phase: BlinkPhase::Open,
        }
    }

    fn no_signal(&mut self) -> BlinkUpdate {
        self.state.signal_gap_frames = self.state.signal_gap_frames.saturating_add(1);
        if self.state.is_closed() && self.state.signal_gap_frames >= self.signal_loss_reset_frames {
            debug!(
                "Signal lost for {} frames, dropping closure of {} frames",
                self.state.signal_gap_frames, self.state.closed_frame_count
            );
            self.clear_closure();
        }

        BlinkUpdate {
            blink: false,
            phase: BlinkPhase::NoSignal,
        }
    }

    /// Abandon an in-progress closure without counting it
    pub fn discard_closure(&mut self) {
        self.clear_closure();
    }

    fn clear_closure(&mut self) {
        self.state.closed_frame_count = 0;
        self.state.closure_start_time = None;
    }

    pub fn state(&self) -> &EyeState {
        &self.state
    }

    pub fn total_blinks(&self) -> u64 {
        self.state.total_blinks
    }

    pub fn reset(&mut self) {
        self.state = EyeState::default();
    }
}

/// Derives the sustained-closure alert from the blink classifier state
#[derive(Debug, Clone, Default)]
pub struct DrowsinessMonitor {
    state: DrowsinessState,
    episodes: u64,
}

impl DrowsinessMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate for the current frame
    ///
    /// The alert holds while the closure is at least `drowsy_frames` long
    /// and clears the frame the eye reopens. Frames without a signal never
    /// alert.
    pub fn evaluate(
        &mut self,
        eye: &EyeState,
        thresholds: &FrameThresholds,
        has_signal: bool,
        now: f64,
    ) -> DrowsinessState {
        let is_alert = has_signal && eye.closed_frame_count >= thresholds.drowsy_frames;

        if is_alert && !self.state.is_alert {
            self.episodes += 1;
            info!(
                "Drowsiness detected: eyes closed for {:.1}s ({} frames)",
                eye.closure_seconds(now),
                eye.closed_frame_count
            );
        }

        self.state = DrowsinessState { is_alert };
        self.state
    }

    /// Drop the alert without evaluating
    pub fn clear(&mut self) {
        self.state = DrowsinessState::default();
    }

    pub fn state(&self) -> DrowsinessState {
        self.state
    }

    /// Number of drowsiness episodes raised this session
    pub fn episodes(&self) -> u64 {
        self.episodes
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const OPEN: f64 = 0.35;
    const CLOSED: f64 = 0.15;

    fn thresholds() -> FrameThresholds {
        FrameThresholds {
            min_blink_frames: 3,
            drowsy_frames: 45,
            min_yawn_frames: 10,
        }
    }

    /// Feed `closed` below-threshold frames, then one open frame.
    /// Returns (blinks counted, whether the alert was ever raised).
    fn closure_then_open(closed: u32) -> (u64, bool) {
        let mut classifier = BlinkClassifier::new(0.25, 15);
        let mut drowsiness = DrowsinessMonitor::new();
        let t = thresholds();
        let mut alerted = false;

        for i in 0..closed {
            let now = i as f64 / 30.0;
            classifier.update(Some(CLOSED), now, &t);
            alerted |= drowsiness.evaluate(classifier.state(), &t, true, now).is_alert;
        }

        let now = closed as f64 / 30.0;
        classifier.update(Some(OPEN), now, &t);
        let after = drowsiness.evaluate(classifier.state(), &t, true, now);
        assert!(!after.is_alert, "alert must clear on reopening");

        (classifier.total_blinks(), alerted)
    }

    #[test]
    fn test_short_closure_is_noise() {
        assert_eq!(closure_then_open(1), (0, false));
        assert_eq!(closure_then_open(2), (0, false));
    }

    #[test]
    fn test_blink_window() {
        assert_eq!(closure_then_open(3), (1, false));
        assert_eq!(closure_then_open(44), (1, false));
    }

    #[test]
    fn test_long_closure_is_drowsiness_not_blink() {
        assert_eq!(closure_then_open(45), (0, true));
        assert_eq!(closure_then_open(120), (0, true));
    }

    #[test]
    fn test_closure_start_recorded_on_first_closed_frame() {
        let mut classifier = BlinkClassifier::new(0.25, 15);
        let t = thresholds();
        classifier.update(Some(OPEN), 0.0, &t);
        classifier.update(Some(CLOSED), 0.5, &t);
        classifier.update(Some(CLOSED), 0.6, &t);
        assert_eq!(classifier.state().closure_start_time, Some(0.5));
        assert_eq!(classifier.state().closed_frame_count, 2);

        classifier.update(Some(OPEN), 0.7, &t);
        assert_eq!(classifier.state().closure_start_time, None);
        assert_eq!(classifier.state().closed_frame_count, 0);
    }

    #[test]
    fn test_no_signal_is_not_a_closed_eye() {
        let mut classifier = BlinkClassifier::new(0.25, 15);
        let t = thresholds();
        for i in 0..60 {
            let update = classifier.update(None, i as f64, &t);
            assert_eq!(update.phase, BlinkPhase::NoSignal);
        }
        assert_eq!(classifier.state().closed_frame_count, 0);
        assert_eq!(classifier.total_blinks(), 0);
    }

    #[test]
    fn test_brief_dropout_keeps_closure() {
        let mut classifier = BlinkClassifier::new(0.25, 15);
        let t = thresholds();
        classifier.update(Some(CLOSED), 0.0, &t);
        classifier.update(Some(CLOSED), 0.1, &t);
        classifier.update(None, 0.2, &t);
        classifier.update(Some(CLOSED), 0.3, &t);
        assert_eq!(classifier.state().closed_frame_count, 3);
        assert!(classifier.update(Some(OPEN), 0.4, &t).blink);
    }

    #[test]
    fn test_long_dropout_discards_closure() {
        let mut classifier = BlinkClassifier::new(0.25, 3);
        let t = thresholds();
        for i in 0..5 {
            classifier.update(Some(CLOSED), i as f64, &t);
        }
        for i in 5..8 {
            classifier.update(None, i as f64, &t);
        }
        assert!(!classifier.state().is_closed());
        assert!(!classifier.update(Some(OPEN), 8.0, &t).blink);
    }

    #[test]
    fn test_drowsiness_never_alerts_without_signal() {
        let mut drowsiness = DrowsinessMonitor::new();
        let eye = EyeState {
            closed_frame_count: 100,
            closure_start_time: Some(0.0),
            ..Default::default()
        };
        assert!(!drowsiness.evaluate(&eye, &thresholds(), false, 4.0).is_alert);
        assert!(drowsiness.evaluate(&eye, &thresholds(), true, 4.0).is_alert);
        assert_eq!(drowsiness.episodes(), 1);
    }

    proptest! {
        #[test]
        fn prop_at_most_one_blink_per_closure(closed in 0u32..200) {
            let (blinks, alerted) = closure_then_open(closed);
            prop_assert!(blinks <= 1);
            prop_assert_eq!(blinks == 1, (3..45).contains(&closed));
            prop_assert_eq!(alerted, closed >= 45);
        }
    }
}
