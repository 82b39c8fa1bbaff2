//! Per-interval accumulators

use monitor::{FrameAnalysis, ProximityStatus, RestTransition};
use serde::{Deserialize, Serialize};

use crate::ComplianceRecord;

/// Counters for the current logging interval
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplianceWindow {
    pub frames: u64,
    pub blink_count: u64,
    pub yawn_count: u64,
    pub drowsy_seconds: f64,
    pub distance_sum_cm: f64,
    /// Frames with a measured distance
    pub valid_distance_samples: u64,
    /// Measured frames at a safe distance
    pub compliant_distance_samples: u64,
    pub rest_cycles_completed: u64,
    pub rest_cycles_scheduled: u64,
}

impl ComplianceWindow {
    /// Add one frame
    pub fn accumulate(&mut self, analysis: &FrameAnalysis) {
        self.frames += 1;
        if analysis.is_blink_event {
            self.blink_count += 1;
        }
        if analysis.is_yawn_event {
            self.yawn_count += 1;
        }
        if analysis.is_drowsy {
            self.drowsy_seconds += analysis.frame_interval_s;
        }

        if let Some(distance) = analysis.distance_cm {
            match analysis.proximity {
                ProximityStatus::Safe => {
                    self.distance_sum_cm += distance;
                    self.valid_distance_samples += 1;
                    self.compliant_distance_samples += 1;
                }
                ProximityStatus::TooClose => {
                    self.distance_sum_cm += distance;
                    self.valid_distance_samples += 1;
                }
                ProximityStatus::NoReading | ProximityStatus::Uncalibrated => {}
            }
        }

        match analysis.rest_transition {
            Some(RestTransition::RestStarted) => self.rest_cycles_scheduled += 1,
            Some(RestTransition::RestCompleted) => self.rest_cycles_completed += 1,
            None => {}
        }
    }

    pub fn avg_distance_cm(&self) -> f64 {
        if self.valid_distance_samples == 0 {
            return 0.0;
        }
        self.distance_sum_cm / self.valid_distance_samples as f64
    }

    pub fn distance_compliance_pct(&self) -> f64 {
        if self.valid_distance_samples == 0 {
            return 0.0;
        }
        100.0 * self.compliant_distance_samples as f64 / self.valid_distance_samples as f64
    }

    /// 100 when no break came due in this window
    pub fn rest_compliance_pct(&self) -> f64 {
        if self.rest_cycles_scheduled == 0 {
            return 100.0;
        }
        let pct = 100.0 * self.rest_cycles_completed as f64 / self.rest_cycles_scheduled as f64;
        pct.clamp(0.0, 100.0)
    }

    /// Build the record for this window
    pub fn summarize(&self, timestamp: f64) -> ComplianceRecord {
        ComplianceRecord {
            timestamp,
            blink_count: self.blink_count,
            time_in_drowsy_sec: self.drowsy_seconds,
            avg_distance_cm: self.avg_distance_cm(),
            distance_compliance_pct: self.distance_compliance_pct(),
            rest_compliance_pct: self.rest_compliance_pct(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.frames == 0
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measured(distance: f64, status: ProximityStatus) -> FrameAnalysis {
        FrameAnalysis {
            distance_cm: Some(distance),
            proximity: status,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_window_defaults() {
        let window = ComplianceWindow::default();
        let record = window.summarize(10.0);
        assert_eq!(record.avg_distance_cm, 0.0);
        assert_eq!(record.distance_compliance_pct, 0.0);
        assert_eq!(record.rest_compliance_pct, 100.0);
        assert!(window.is_empty());
    }

    #[test]
    fn test_distance_only_counts_measurements() {
        let mut window = ComplianceWindow::default();
        window.accumulate(&measured(60.0, ProximityStatus::Safe));
        window.accumulate(&measured(60.0, ProximityStatus::Safe));
        window.accumulate(&measured(60.0, ProximityStatus::Safe));
        window.accumulate(&measured(40.0, ProximityStatus::TooClose));
        window.accumulate(&FrameAnalysis {
            proximity: ProximityStatus::NoReading,
            ..Default::default()
        });

        assert_eq!(window.frames, 5);
        assert_eq!(window.avg_distance_cm(), 55.0);
        assert_eq!(window.distance_compliance_pct(), 75.0);
    }

    #[test]
    fn test_drowsy_time_sums_intervals() {
        let mut window = ComplianceWindow::default();
        for _ in 0..10 {
            window.accumulate(&FrameAnalysis {
                frame_interval_s: 0.1,
                is_drowsy: true,
                ..Default::default()
            });
        }
        window.accumulate(&FrameAnalysis {
            frame_interval_s: 0.1,
            ..Default::default()
        });
        assert!((window.drowsy_seconds - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_rest_compliance() {
        let mut window = ComplianceWindow::default();
        window.accumulate(&FrameAnalysis {
            rest_transition: Some(RestTransition::RestStarted),
            ..Default::default()
        });
        assert_eq!(window.rest_compliance_pct(), 0.0);
        window.accumulate(&FrameAnalysis {
            rest_transition: Some(RestTransition::RestCompleted),
            ..Default::default()
        });
        assert_eq!(window.rest_compliance_pct(), 100.0);

        // Break completed here but scheduled in an earlier window
        let mut window = ComplianceWindow::default();
        window.rest_cycles_scheduled = 1;
        window.rest_cycles_completed = 2;
        assert_eq!(window.rest_compliance_pct(), 100.0);
    }
}
