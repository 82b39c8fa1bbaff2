//! Focal-length calibrator

use std::path::Path;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::{CalibrationConfig, CalibrationError, CalibrationRecord};

/// Collects face-width samples at a known distance
pub struct Calibrator {
    config: CalibrationConfig,
    samples: Vec<f64>,
    rejected: usize,
}

impl Calibrator {
    /// Create a new calibrator
    pub fn new(config: CalibrationConfig) -> Self {
        info!(
            "Calibrating at {} cm with a {} cm face width",
            config.known_distance_cm, config.known_face_width_cm
        );
        Self {
            config,
            samples: Vec::with_capacity(64),
            rejected: 0,
        }
    }

    /// Offer one face-width sample; returns whether it was kept
    pub fn add_sample(&mut self, pixel_width: f64) -> bool {
        if !pixel_width.is_finite() || pixel_width <= self.config.min_pixel_width {
            self.rejected += 1;
            debug!(
                "Rejected face width {:.1}px (floor {:.1}px)",
                pixel_width, self.config.min_pixel_width
            );
            return false;
        }

        self.samples.push(pixel_width);
        true
    }

    /// Number of accepted samples
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Number of rejected samples
    pub fn rejected_count(&self) -> usize {
        self.rejected
    }

    /// Whether enough samples were collected to complete
    pub fn is_ready(&self) -> bool {
        self.samples.len() >= self.config.min_samples
    }

    /// Median of the accepted samples
    pub fn median_pixel_width(&self) -> Option<f64> {
        geometry::median(&self.samples)
    }

    /// Compute the calibration record without persisting it
    pub fn finish(&self, timestamp: f64) -> Result<CalibrationRecord, CalibrationError> {
        if !self.is_ready() {
            warn!(
                "Calibration incomplete: {} of {} samples",
                self.samples.len(),
                self.config.min_samples
            );
            return Err(CalibrationError::InsufficientSamples {
                collected: self.samples.len(),
                required: self.config.min_samples,
            });
        }

        let pixel_width = self.median_pixel_width().ok_or(CalibrationError::InsufficientSamples {
            collected: 0,
            required: self.config.min_samples,
        })?;

        let focal = geometry::focal_length(
            self.config.known_distance_cm,
            self.config.known_face_width_cm,
            pixel_width,
        )
        .get()
        .ok_or_else(|| {
            CalibrationError::InvalidRecord(format!(
                "cannot derive focal length from {}px at {} cm",
                pixel_width, self.config.known_distance_cm
            ))
        })?;

        let record = CalibrationRecord {
            focal_length: focal,
            known_distance_cm: self.config.known_distance_cm,
            known_face_width_cm: self.config.known_face_width_cm,
            calibration_timestamp: timestamp,
        };
        record.validate()?;

        info!(
            "Median face width {:.2}px -> focal length {:.2}px",
            pixel_width, record.focal_length
        );
        Ok(record)
    }

    /// Compute the record and write it to `path`
    ///
    /// Nothing is written when the calibration cannot complete.
    pub fn complete(&self, path: impl AsRef<Path>) -> Result<CalibrationRecord, CalibrationError> {
        let now = Utc::now().timestamp_millis() as f64 / 1000.0;
        let record = self.finish(now)?;
        record.save(path)?;
        Ok(record)
    }

    /// Drop all collected samples
    pub fn reset(&mut self) {
        self.samples.clear();
        self.rejected = 0;
    }
}

impl Default for Calibrator {
    fn default() -> Self {
        Self::new(CalibrationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_rejects_spurious_widths() {
        let mut calibrator = Calibrator::default();
        assert!(!calibrator.add_sample(0.0));
        assert!(!calibrator.add_sample(50.0));
        assert!(!calibrator.add_sample(f64::NAN));
        assert!(calibrator.add_sample(50.5));
        assert_eq!(calibrator.sample_count(), 1);
        assert_eq!(calibrator.rejected_count(), 3);
    }

    #[test]
    fn test_insufficient_samples() {
        let mut calibrator = Calibrator::default();
        for _ in 0..9 {
            calibrator.add_sample(300.0);
        }
        assert!(!calibrator.is_ready());
        match calibrator.finish(0.0) {
            Err(CalibrationError::InsufficientSamples { collected, required }) => {
                assert_eq!(collected, 9);
                assert_eq!(required, 10);
            }
            other => panic!("expected InsufficientSamples, got {:?}", other),
        }
    }

    #[test]
    fn test_median_resists_outliers() {
        let mut calibrator = Calibrator::default();
        for _ in 0..9 {
            calibrator.add_sample(300.0);
        }
        calibrator.add_sample(1900.0); // misdetection
        calibrator.add_sample(301.0);

        let record = calibrator.finish(1_700_000_000.0).unwrap();
        let expected = 300.0 * 60.0 / 14.0;
        assert!((record.focal_length - expected).abs() < 1e-9);
        assert_eq!(record.known_distance_cm, 60.0);
        assert_eq!(record.calibration_timestamp, 1_700_000_000.0);
    }

    #[test]
    fn test_complete_writes_nothing_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calibration.json");

        let calibrator = Calibrator::default();
        assert!(calibrator.complete(&path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_complete_persists_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calibration.json");

        let mut calibrator = Calibrator::default();
        for width in 290..302 {
            calibrator.add_sample(width as f64);
        }
        let record = calibrator.complete(&path).unwrap();
        let loaded = CalibrationRecord::load(&path).unwrap();
        assert!((loaded.focal_length - record.focal_length).abs() < 1e-9);
        assert_eq!(loaded.known_face_width_cm, record.known_face_width_cm);
    }
}
