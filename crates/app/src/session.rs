//! Monitoring session loop
//!
//! Receives frames from a bounded queue, runs each through the monitor and
//! the compliance aggregator, and hands finished records to the sink. The
//! loop stops when the stop flag is raised or the frame queue closes; the
//! partial window is dropped in both cases.

use std::sync::Arc;

use compliance::ComplianceAggregator;
use landmarks::{LandmarkError, LandmarkFrame};
use monitor::{EyeMonitor, FrameAnalysis, MonitorAlert, MonitorError, MonitorTotals};
use serde::Serialize;
use storage::RecordSink;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

/// Session errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Monitor error: {0}")]
    Monitor(#[from] MonitorError),

    #[error("Frame source error: {0}")]
    Source(#[from] LandmarkError),

    #[error("Frame source task failed: {0}")]
    Task(String),
}

/// Counters for one session run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub frames_processed: u64,
    pub frames_rejected: u64,
    pub records_written: u64,
    pub sink_failures: u64,
    pub alerts_raised: u64,
    /// Analyses not delivered because the renderer queue was full
    pub analyses_dropped: u64,
}

/// Owns the monitor and aggregator for one user session
pub struct Session {
    monitor: EyeMonitor,
    aggregator: ComplianceAggregator,
    sink: Arc<dyn RecordSink>,
    analysis_tx: Option<mpsc::Sender<FrameAnalysis>>,
    active_alerts: Vec<MonitorAlert>,
    stats: SessionStats,
}

impl Session {
    pub fn new(
        monitor: EyeMonitor,
        aggregator: ComplianceAggregator,
        sink: Arc<dyn RecordSink>,
    ) -> Self {
        Self {
            monitor,
            aggregator,
            sink,
            analysis_tx: None,
            active_alerts: Vec::new(),
            stats: SessionStats::default(),
        }
    }

    /// Forward every frame analysis to a renderer (non-blocking)
    pub fn with_analysis_channel(mut self, analysis_tx: mpsc::Sender<FrameAnalysis>) -> Self {
        self.analysis_tx = Some(analysis_tx);
        self
    }

    /// Run one frame through the pipeline
    pub fn process_frame(&mut self, frame: &LandmarkFrame) -> Result<FrameAnalysis, SessionError> {
        let analysis = self.monitor.process(frame)?;
        self.stats.frames_processed += 1;
        metrics::counter!("frames_processed_total").increment(1);

        self.track_alerts(&analysis);

        if let Some(record) = self.aggregator.push(&analysis) {
            match self.sink.append(&record) {
                Ok(()) => {
                    self.stats.records_written += 1;
                    metrics::counter!("compliance_records_total").increment(1);
                    debug!(
                        "Logged record: {} blinks, {:.1}s drowsy, {:.0}% distance compliance",
                        record.blink_count, record.time_in_drowsy_sec, record.distance_compliance_pct
                    );
                }
                Err(e) => {
                    self.stats.sink_failures += 1;
                    warn!("Failed to write compliance record: {}", e);
                }
            }
        }

        if let Some(tx) = &self.analysis_tx {
            if tx.try_send(analysis.clone()).is_err() {
                self.stats.analyses_dropped += 1;
            }
        }

        Ok(analysis)
    }

    /// Count alerts on the frame they become active
    fn track_alerts(&mut self, analysis: &FrameAnalysis) {
        for alert in &analysis.alerts {
            if !self.active_alerts.contains(alert) {
                self.stats.alerts_raised += 1;
                metrics::counter!("monitor_alerts_total", "alert" => format!("{:?}", alert))
                    .increment(1);
            }
        }
        self.active_alerts.clone_from(&analysis.alerts);
    }

    /// Run the session loop until stopped or the frame queue closes
    pub async fn run(
        &mut self,
        mut frame_rx: mpsc::Receiver<LandmarkFrame>,
        mut stop_rx: watch::Receiver<bool>,
    ) -> Result<SessionStats, SessionError> {
        info!("Starting monitoring session");
        let mut stop_open = true;

        loop {
            if *stop_rx.borrow() {
                info!("Stop requested");
                break;
            }

            tokio::select! {
                biased;

                changed = stop_rx.changed(), if stop_open => {
                    if changed.is_err() {
                        // No one can request a stop any more
                        stop_open = false;
                    }
                }

                frame = frame_rx.recv() => match frame {
                    Some(frame) => {
                        if let Err(e) = self.process_frame(&frame) {
                            self.stats.frames_rejected += 1;
                            warn!("Skipping frame {}: {}", frame.sequence, e);
                        }
                    }
                    None => {
                        info!("Frame source closed");
                        break;
                    }
                },
            }
        }

        self.aggregator.discard();
        info!(
            "Session finished: {} frames, {} records, {} alerts",
            self.stats.frames_processed, self.stats.records_written, self.stats.alerts_raised
        );
        Ok(self.stats)
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn totals(&self) -> MonitorTotals {
        self.monitor.totals()
    }
}
