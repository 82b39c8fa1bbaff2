//! Eye Health Monitor Application
//!
//! Wires a landmark frame source through the eye monitor and compliance
//! aggregator into the CSV log, and renders the review report.

pub mod calibrate;
pub mod replay;
pub mod report;
pub mod session;
pub mod settings;

pub use calibrate::collect_face_widths;
pub use replay::ReplayTask;
pub use report::Report;
pub use session::{Session, SessionError, SessionStats};
pub use settings::{AppSettings, Preset, SettingsError};

use calibration::CalibrationRecord;
use monitor::CameraModel;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Initialize logging
pub fn init_logging(verbose: bool, json: bool) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    }
}

/// Camera parameters for the distance estimator
///
/// The face width stored with the calibration wins; older files without
/// one fall back to `fallback_width_cm`.
pub fn camera_model(record: &CalibrationRecord, fallback_width_cm: f64) -> CameraModel {
    let known_face_width_cm = if record.known_face_width_cm > 0.0 {
        record.known_face_width_cm
    } else {
        fallback_width_cm
    };
    CameraModel {
        focal_length: record.focal_length,
        known_face_width_cm,
    }
}
