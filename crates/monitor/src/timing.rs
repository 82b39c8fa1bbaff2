//! Observed frame rate and frame-count thresholds

use crate::MonitorConfig;

/// EWMA smoothing factor for frame intervals
const DEFAULT_ALPHA: f64 = 0.1;

/// Intervals longer than this are stalls and are not used for the rate
const MAX_TRACKED_INTERVAL_S: f64 = 1.0;

/// Frame-count thresholds in effect for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameThresholds {
    pub min_blink_frames: u32,
    pub drowsy_frames: u32,
    pub min_yawn_frames: u32,
}

impl FrameThresholds {
    /// Thresholds exactly as configured
    pub fn from_config(config: &MonitorConfig) -> Self {
        Self {
            min_blink_frames: config.min_blink_frames,
            drowsy_frames: config.drowsy_frames,
            min_yawn_frames: config.min_yawn_frames,
        }
    }

    /// Rescale configured thresholds by `observed_fps / reference_fps`
    pub fn scaled(config: &MonitorConfig, observed_fps: f64) -> Self {
        let ratio = observed_fps / config.reference_fps;
        if !ratio.is_finite() || ratio <= 0.0 {
            return Self::from_config(config);
        }

        let scale = |frames: u32| ((frames as f64 * ratio).round() as u32).max(1);
        let min_blink_frames = scale(config.min_blink_frames);
        Self {
            min_blink_frames,
            drowsy_frames: scale(config.drowsy_frames).max(min_blink_frames + 1),
            min_yawn_frames: scale(config.min_yawn_frames),
        }
    }
}

/// Tracks the observed frame rate with an exponentially weighted moving
/// average of frame intervals
#[derive(Debug, Clone)]
pub struct FrameRateEstimator {
    alpha: f64,
    reference_fps: f64,
    mean_interval: Option<f64>,
    last_timestamp: Option<f64>,
}

impl FrameRateEstimator {
    pub fn new(reference_fps: f64) -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            reference_fps,
            mean_interval: None,
            last_timestamp: None,
        }
    }

    /// Record a frame timestamp and return the interval since the last frame
    ///
    /// The first frame, and any frame whose timestamp does not advance,
    /// has a zero interval.
    pub fn observe(&mut self, timestamp: f64) -> f64 {
        let interval = match self.last_timestamp {
            Some(last) if timestamp > last => timestamp - last,
            Some(_) => return 0.0,
            None => 0.0,
        };
        self.last_timestamp = Some(timestamp);

        if interval > 0.0 && interval <= MAX_TRACKED_INTERVAL_S {
            self.mean_interval = Some(match self.mean_interval {
                Some(mean) => mean + self.alpha * (interval - mean),
                None => interval,
            });
        }

        interval
    }

    /// Observed frames per second; the reference rate until measured
    pub fn fps(&self) -> f64 {
        self.mean_interval
            .filter(|mean| *mean > 0.0)
            .map_or(self.reference_fps, |mean| 1.0 / mean)
    }

    /// Thresholds for the current frame
    pub fn thresholds(&self, config: &MonitorConfig) -> FrameThresholds {
        if config.adaptive_frame_timing {
            FrameThresholds::scaled(config, self.fps())
        } else {
            FrameThresholds::from_config(config)
        }
    }

    pub fn reset(&mut self) {
        self.mean_interval = None;
        self.last_timestamp = None;
    }
}
