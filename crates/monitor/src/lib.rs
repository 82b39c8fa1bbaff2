//! Eye Monitor
//!
//! Per-frame eye health classification over facial landmarks:
//! - Blink counting with noise and drowsiness rejection
//! - Sustained eye closure (drowsiness) alerts
//! - Yawn counting from the mouth aspect ratio
//! - Camera proximity alerts from the calibrated face width
//! - 20-20-20 work/rest cycle reminders

pub mod analysis;
pub mod blink;
pub mod config;
pub mod proximity;
pub mod rest;
pub mod state;
pub mod timing;
pub mod yawn;

pub use analysis::{FrameAnalysis, MonitorAlert};
pub use blink::{BlinkClassifier, BlinkUpdate, DrowsinessMonitor};
pub use config::{MonitorConfig, RestConfig, RestPolicy};
pub use proximity::{CameraModel, ProximityMonitor};
pub use rest::{RestCycleScheduler, RestTransition};
pub use state::{BlinkPhase, EyeState, ProximityStatus, RestPhase};
pub use timing::{FrameRateEstimator, FrameThresholds};
pub use yawn::YawnDetector;

use landmarks::{FaceLandmarks, LandmarkError, LandmarkFrame, LandmarkLayout};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Monitor error types
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid frame timestamp: {0}")]
    InvalidTimestamp(f64),

    #[error("Landmark error: {0}")]
    Landmarks(#[from] LandmarkError),
}

/// Session counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorTotals {
    pub frames: u64,
    pub blinks: u64,
    pub yawns: u64,
    pub drowsiness_episodes: u64,
    pub rest_cycles_scheduled: u64,
    pub rest_cycles_completed: u64,
}

/// Eye monitoring pipeline
pub struct EyeMonitor {
    config: MonitorConfig,
    layout: LandmarkLayout,
    frame_rate: FrameRateEstimator,
    blink: BlinkClassifier,
    drowsiness: DrowsinessMonitor,
    yawn: YawnDetector,
    proximity: ProximityMonitor,
    rest: RestCycleScheduler,
    face_absent_frames: u32,
    short_frames: u64,
    frames: u64,
}

impl EyeMonitor {
    /// Create an uncalibrated monitor
    pub fn new(config: MonitorConfig, layout: LandmarkLayout) -> Result<Self, MonitorError> {
        config.validate()?;
        info!(
            "Eye monitor: EAR < {}, drowsy after {} frames, min distance {} cm",
            config.ear_threshold, config.drowsy_frames, config.distance_threshold_cm
        );

        Ok(Self {
            frame_rate: FrameRateEstimator::new(config.reference_fps),
            blink: BlinkClassifier::new(config.ear_threshold, config.signal_loss_reset_frames),
            drowsiness: DrowsinessMonitor::new(),
            yawn: YawnDetector::new(config.mar_threshold),
            proximity: ProximityMonitor::new(config.distance_threshold_cm, None),
            rest: RestCycleScheduler::new(config.rest.clone()),
            face_absent_frames: 0,
            short_frames: 0,
            frames: 0,
            layout,
            config,
        })
    }

    /// Enable distance estimation with a calibrated camera
    pub fn with_camera(mut self, camera: CameraModel) -> Self {
        info!(
            "Distance estimation enabled: focal length {:.1} px, face width {} cm",
            camera.focal_length, camera.known_face_width_cm
        );
        self.proximity = ProximityMonitor::new(self.config.distance_threshold_cm, Some(camera));
        self
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Analyze a single frame
    pub fn process(&mut self, frame: &LandmarkFrame) -> Result<FrameAnalysis, MonitorError> {
        let now = frame.timestamp_s;
        if !now.is_finite() {
            return Err(MonitorError::InvalidTimestamp(now));
        }
        self.frames += 1;

        let frame_interval_s = self.frame_rate.observe(now);
        let thresholds = self.frame_rate.thresholds(&self.config);

        let freeze = self.config.rest_policy == RestPolicy::FreezeClassification;
        let rest_transition = self.rest.update(now);
        if rest_transition == Some(RestTransition::RestStarted) && freeze {
            self.blink.discard_closure();
            self.yawn.discard();
        }

        let face = self.locate_face(frame);
        if face.is_some() {
            self.face_absent_frames = 0;
        } else {
            self.face_absent_frames = self.face_absent_frames.saturating_add(1);
        }

        let ear = face.as_ref().and_then(|f| {
            geometry::mean_eye_aspect_ratio(&f.left_eye, &f.right_eye).get()
        });
        let mar = face.as_ref().and_then(|f| {
            let [top, bottom, left, right] = f.mouth;
            geometry::mouth_aspect_ratio(top, bottom, left, right).get()
        });
        let pixel_width = face
            .as_ref()
            .map(|f| geometry::pixel_span(f.face_width[0], f.face_width[1]));

        let proximity = self.proximity.update(pixel_width);

        let (blink, is_drowsy, is_yawn_event) = if freeze && self.rest.is_resting() {
            self.drowsiness.clear();
            (BlinkUpdate::suspended(), false, false)
        } else {
            let blink = self.blink.update(ear, now, &thresholds);
            let drowsy = self
                .drowsiness
                .evaluate(self.blink.state(), &thresholds, ear.is_some(), now);
            let yawned = self.yawn.update(mar, &thresholds);
            (blink, drowsy.is_alert, yawned)
        };

        let mut alerts = Vec::new();
        if is_drowsy {
            alerts.push(MonitorAlert::Drowsiness);
        }
        if proximity.is_too_close() {
            alerts.push(MonitorAlert::TooClose);
        }
        if self.face_absent_frames >= self.config.face_absent_alert_frames {
            if self.face_absent_frames == self.config.face_absent_alert_frames {
                warn!("Face not visible for {} frames", self.face_absent_frames);
            }
            alerts.push(MonitorAlert::FaceNotVisible);
        }
        if self.rest.is_resting() {
            alerts.push(MonitorAlert::RestDue);
        }
        if is_yawn_event {
            alerts.push(MonitorAlert::Yawning);
        }

        Ok(FrameAnalysis {
            timestamp_s: now,
            frame_interval_s,
            face_detected: face.is_some(),
            ear,
            mar,
            distance_cm: proximity.has_reading().then_some(proximity.current_distance_cm),
            blink_phase: blink.phase,
            is_blink_event: blink.blink,
            is_drowsy,
            is_yawn_event,
            proximity: proximity.status,
            is_too_close: proximity.is_too_close(),
            rest_phase: self.rest.phase(),
            rest_remaining_s: self.rest.remaining(now),
            rest_transition,
            alerts,
        })
    }

    fn locate_face(&mut self, frame: &LandmarkFrame) -> Option<FaceLandmarks> {
        if !frame.face_detected() {
            return None;
        }
        match self.layout.extract(frame) {
            Ok(face) => Some(face),
            Err(e) => {
                self.short_frames += 1;
                if self.short_frames == 1 {
                    warn!(
                        "Frame {} unusable for layout needing {} points: {}",
                        frame.sequence,
                        self.layout.required_points(),
                        e
                    );
                } else {
                    debug!("Frame {} unusable: {}", frame.sequence, e);
                }
                None
            }
        }
    }

    /// Session counters so far
    pub fn totals(&self) -> MonitorTotals {
        let rest = self.rest.state();
        MonitorTotals {
            frames: self.frames,
            blinks: self.blink.total_blinks(),
            yawns: self.yawn.total_yawns(),
            drowsiness_episodes: self.drowsiness.episodes(),
            rest_cycles_scheduled: rest.cycles_scheduled,
            rest_cycles_completed: rest.cycles_completed,
        }
    }

    /// Reset all per-session state (on user change)
    pub fn reset_state(&mut self) {
        self.frame_rate.reset();
        self.blink.reset();
        self.drowsiness.reset();
        self.yawn.reset();
        self.proximity.reset();
        self.rest.reset();
        self.face_absent_frames = 0;
        self.short_frames = 0;
        self.frames = 0;
    }
}
