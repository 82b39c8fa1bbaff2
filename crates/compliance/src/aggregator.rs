//! Fixed-interval record producer

use monitor::FrameAnalysis;
use tracing::{debug, info};

use crate::{ComplianceConfig, ComplianceRecord, ComplianceWindow};

/// Emits one compliance record per logging interval
#[derive(Debug, Clone)]
pub struct ComplianceAggregator {
    config: ComplianceConfig,
    window: ComplianceWindow,
    window_start: Option<f64>,
    records_emitted: u64,
}

impl ComplianceAggregator {
    pub fn new(config: ComplianceConfig) -> Self {
        Self {
            config,
            window: ComplianceWindow::default(),
            window_start: None,
            records_emitted: 0,
        }
    }

    /// Add one frame; returns a record when the frame closes the window
    ///
    /// The window starts at the first frame. The closing frame is counted
    /// in the window it closes and its timestamp starts the next one.
    pub fn push(&mut self, analysis: &FrameAnalysis) -> Option<ComplianceRecord> {
        let now = analysis.timestamp_s;
        let start = *self.window_start.get_or_insert(now);
        self.window.accumulate(analysis);

        if now - start < self.config.logging_interval_sec {
            return None;
        }

        let record = self.window.summarize(now);
        debug!(
            "Window closed: {} frames, {} blinks, {} yawns",
            self.window.frames, self.window.blink_count, self.window.yawn_count
        );
        self.window.clear();
        self.window_start = Some(now);
        self.records_emitted += 1;
        Some(record)
    }

    /// Drop the partial window without emitting it
    pub fn discard(&mut self) {
        if !self.window.is_empty() {
            info!("Discarding partial window of {} frames", self.window.frames);
        }
        self.window.clear();
        self.window_start = None;
    }

    /// Accumulators for the window in progress
    pub fn window(&self) -> &ComplianceWindow {
        &self.window
    }

    pub fn records_emitted(&self) -> u64 {
        self.records_emitted
    }
}

impl Default for ComplianceAggregator {
    fn default() -> Self {
        Self::new(ComplianceConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use monitor::ProximityStatus;
    use proptest::prelude::*;

    fn frame(i: u64, blink: bool) -> FrameAnalysis {
        FrameAnalysis {
            timestamp_s: i as f64 / 30.0,
            frame_interval_s: if i == 0 { 0.0 } else { 1.0 / 30.0 },
            is_blink_event: blink,
            distance_cm: Some(60.0),
            proximity: ProximityStatus::Safe,
            ..Default::default()
        }
    }

    #[test]
    fn test_one_record_per_interval() {
        let mut aggregator = ComplianceAggregator::default();
        let records: Vec<_> = (0..1800u64)
            .filter_map(|i| aggregator.push(&frame(i, false)))
            .collect();

        // Windows close at 15 s, 30 s and 45 s; the last one is partial
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].timestamp, 15.0);
        assert_eq!(records[1].timestamp, 30.0);
        assert_eq!(records[2].timestamp, 45.0);
        assert_eq!(aggregator.records_emitted(), 3);
        assert!(!aggregator.window().is_empty());
    }

    #[test]
    fn test_accumulators_reset_after_emission() {
        let mut aggregator = ComplianceAggregator::default();
        let mut emitted = None;
        for i in 0..=450u64 {
            if let Some(record) = aggregator.push(&frame(i, i % 90 == 10)) {
                emitted = Some(record);
            }
        }

        let record = emitted.unwrap();
        assert_eq!(record.blink_count, 5);
        assert_eq!(record.avg_distance_cm, 60.0);
        assert_eq!(record.distance_compliance_pct, 100.0);
        assert_eq!(record.rest_compliance_pct, 100.0);
        assert_eq!(*aggregator.window(), ComplianceWindow::default());
    }

    #[test]
    fn test_identical_windows_give_identical_records() {
        let mut aggregator = ComplianceAggregator::default();
        let mut records = Vec::new();
        for i in 0..=900u64 {
            // Blinks every 3 s and a short drowsy run in both windows
            let mut analysis = frame(i, i % 90 == 45);
            analysis.is_drowsy = (60..65).contains(&(i % 90));
            if let Some(record) = aggregator.push(&analysis) {
                records.push(record);
            }
        }
        assert_eq!(records.len(), 2);
        let (first, second) = (&records[0], &records[1]);
        assert!(first.time_in_drowsy_sec > 0.0);
        assert_eq!(second.timestamp - first.timestamp, 15.0);
        assert_eq!(
            *first,
            ComplianceRecord {
                timestamp: first.timestamp,
                ..second.clone()
            }
        );
    }

    #[test]
    fn test_discard_drops_partial_window() {
        let mut aggregator = ComplianceAggregator::default();
        for i in 0..300u64 {
            assert!(aggregator.push(&frame(i, true)).is_none());
        }
        aggregator.discard();
        assert!(aggregator.window().is_empty());

        // Next frame re-anchors the window
        assert!(aggregator.push(&frame(900, false)).is_none());
        assert!(aggregator.push(&frame(1349, false)).is_none());
        let record = aggregator.push(&frame(1350, false)).unwrap();
        assert_eq!(record.blink_count, 0);
    }

    proptest! {
        #[test]
        fn prop_record_count_matches_elapsed(frames in 1u64..3000) {
            let mut aggregator = ComplianceAggregator::default();
            let emitted = (0..frames)
                .filter(|i| aggregator.push(&frame(*i, false)).is_some())
                .count() as u64;
            // Each window spans exactly 450 frames at 30 fps
            prop_assert_eq!(emitted, (frames - 1) / 450);
        }
    }
}
