//! Camera proximity monitoring

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::state::{ProximityState, ProximityStatus};

/// Calibrated pinhole camera parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraModel {
    /// Focal length in pixels
    pub focal_length: f64,
    /// Physical width between the face-width anchors (cm)
    pub known_face_width_cm: f64,
}

/// Flags a face that is too close to the camera
#[derive(Debug, Clone)]
pub struct ProximityMonitor {
    threshold_cm: f64,
    camera: Option<CameraModel>,
    state: ProximityState,
}

impl ProximityMonitor {
    /// `camera` is `None` when running uncalibrated
    pub fn new(threshold_cm: f64, camera: Option<CameraModel>) -> Self {
        Self {
            threshold_cm,
            camera,
            state: ProximityState::default(),
        }
    }

    /// Update with the face-width pixel span; `None` when no face was found
    pub fn update(&mut self, face_pixel_width: Option<f64>) -> ProximityState {
        let previous = self.state.status;
        self.state = self.classify(face_pixel_width);

        if self.state.status == ProximityStatus::TooClose && previous != ProximityStatus::TooClose {
            info!(
                "Too close to the camera: {:.1} cm (minimum {:.0} cm)",
                self.state.current_distance_cm, self.threshold_cm
            );
        }
        self.state
    }

    fn classify(&self, face_pixel_width: Option<f64>) -> ProximityState {
        let Some(camera) = self.camera else {
            return ProximityState {
                current_distance_cm: 0.0,
                status: ProximityStatus::Uncalibrated,
            };
        };

        let reading = face_pixel_width.and_then(|width| {
            geometry::distance_cm(camera.focal_length, camera.known_face_width_cm, width).get()
        });

        match reading {
            Some(distance) if distance > 0.0 && distance < self.threshold_cm => ProximityState {
                current_distance_cm: distance,
                status: ProximityStatus::TooClose,
            },
            Some(distance) if distance > 0.0 => ProximityState {
                current_distance_cm: distance,
                status: ProximityStatus::Safe,
            },
            _ => ProximityState {
                current_distance_cm: 0.0,
                status: ProximityStatus::NoReading,
            },
        }
    }

    pub fn state(&self) -> ProximityState {
        self.state
    }

    pub fn reset(&mut self) {
        self.state = ProximityState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> CameraModel {
        // 300 px at 60 cm with a 14 cm face
        CameraModel {
            focal_length: 300.0 * 60.0 / 14.0,
            known_face_width_cm: 14.0,
        }
    }

    #[test]
    fn test_safe_distance() {
        let mut monitor = ProximityMonitor::new(45.0, Some(camera()));
        let state = monitor.update(Some(300.0));
        assert_eq!(state.status, ProximityStatus::Safe);
        assert!((state.current_distance_cm - 60.0).abs() < 1e-9);
        assert!(!state.is_too_close());
    }

    #[test]
    fn test_too_close() {
        let mut monitor = ProximityMonitor::new(45.0, Some(camera()));
        // 30 cm
        let state = monitor.update(Some(600.0));
        assert!(state.is_too_close());
    }

    #[test]
    fn test_no_face_is_no_reading() {
        let mut monitor = ProximityMonitor::new(45.0, Some(camera()));
        assert_eq!(monitor.update(None).status, ProximityStatus::NoReading);
        assert_eq!(monitor.update(Some(0.0)).status, ProximityStatus::NoReading);
        assert!(!monitor.state().is_too_close());
    }

    #[test]
    fn test_uncalibrated_never_alerts() {
        let mut monitor = ProximityMonitor::new(45.0, None);
        let state = monitor.update(Some(2000.0));
        assert_eq!(state.status, ProximityStatus::Uncalibrated);
        assert!(!state.is_too_close());
    }
}
