//! Layered application settings
//!
//! Preset defaults, then an optional settings file (TOML, JSON or YAML),
//! then `EYE_MONITOR__*` environment variables, e.g.
//! `EYE_MONITOR__MONITOR__EAR_THRESHOLD=0.22`. The top-level `preset` key
//! selects which defaults the other two layers start from.

use std::path::{Path, PathBuf};

use calibration::CalibrationConfig;
use compliance::{ComplianceConfig, ReportConfig};
use config::builder::{ConfigBuilder, DefaultState};
use landmarks::LayoutKind;
use monitor::MonitorConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Settings file looked up in the working directory when none is given
pub const DEFAULT_SETTINGS_FILE: &str = "eye-monitor";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "EYE_MONITOR";

/// Settings errors
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid settings: {0}")]
    Invalid(String),
}

/// Threshold presets for the monitor and the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    #[default]
    Standard,
    /// Earlier drowsiness alerts, larger safe distance, tighter risk flags
    Strict,
    /// Later drowsiness alerts, smaller safe distance, looser risk flags
    Lenient,
}

/// File locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    pub calibration_file: PathBuf,
    pub log_file: PathBuf,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            calibration_file: PathBuf::from("calibration.json"),
            log_file: PathBuf::from("eye_health_log.csv"),
        }
    }
}

/// Session loop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Capacity of the frame queue between source and monitor
    pub frame_queue: usize,

    /// Replay frames at their recorded pace instead of as fast as possible
    pub realtime_replay: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            frame_queue: 64,
            realtime_replay: false,
        }
    }
}

/// All settings for the binary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub preset: Preset,
    pub layout: LayoutKind,
    pub monitor: MonitorConfig,
    pub compliance: ComplianceConfig,
    pub calibration: CalibrationConfig,
    pub report: ReportConfig,
    pub paths: PathSettings,
    pub session: SessionSettings,
}

impl AppSettings {
    /// Defaults for a preset
    pub fn with_preset(preset: Preset) -> Self {
        let (monitor, report) = match preset {
            Preset::Standard => (MonitorConfig::default(), ReportConfig::default()),
            Preset::Strict => (MonitorConfig::strict(), ReportConfig::strict()),
            Preset::Lenient => (MonitorConfig::lenient(), ReportConfig::lenient()),
        };
        Self {
            preset,
            monitor,
            report,
            ..Default::default()
        }
    }

    /// Load settings from `path` (required) or the default file (optional),
    /// with environment overrides on top
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let preset = match layered(config::Config::builder(), path)
            .build()?
            .get::<Preset>("preset")
        {
            Ok(preset) => preset,
            Err(config::ConfigError::NotFound(_)) => Preset::default(),
            Err(e) => return Err(e.into()),
        };

        let defaults = config::Config::try_from(&Self::with_preset(preset))?;
        let settings: AppSettings = layered(config::Config::builder().add_source(defaults), path)
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        debug!("Loaded settings: {:?}", settings);
        Ok(settings)
    }

    /// Check cross-section constraints
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.monitor
            .validate()
            .map_err(|e| SettingsError::Invalid(e.to_string()))?;

        let interval = self.compliance.logging_interval_sec;
        if !interval.is_finite() || interval <= 0.0 {
            return Err(SettingsError::Invalid(format!(
                "compliance.logging_interval_sec must be positive, got {}",
                interval
            )));
        }
        if self.session.frame_queue == 0 {
            return Err(SettingsError::Invalid("session.frame_queue must be at least 1".into()));
        }
        if self.calibration.min_samples == 0 {
            return Err(SettingsError::Invalid("calibration.min_samples must be at least 1".into()));
        }
        Ok(())
    }

    /// Report settings aligned with the logging interval
    pub fn report_config(&self) -> ReportConfig {
        ReportConfig {
            logging_interval_sec: self.compliance.logging_interval_sec,
            ..self.report.clone()
        }
    }
}

/// Add the settings file and environment layers
fn layered(builder: ConfigBuilder<DefaultState>, path: Option<&Path>) -> ConfigBuilder<DefaultState> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_SETTINGS_FILE).required(false),
    };
    builder.add_source(file).add_source(
        config::Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_are_valid() {
        let settings = AppSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.layout, LayoutKind::FaceMesh);
        assert_eq!(settings.paths.log_file, PathBuf::from("eye_health_log.csv"));
        assert_eq!(settings.compliance.logging_interval_sec, 15.0);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(
            &path,
            "layout = \"dlib68\"\n\
             [monitor]\n\
             ear_threshold = 0.2\n\
             rest_policy = \"continue_classification\"\n\
             [paths]\n\
             log_file = \"logs/eye.csv\"\n",
        )
        .unwrap();

        let settings = AppSettings::load(Some(&path)).unwrap();
        assert_eq!(settings.layout, LayoutKind::Dlib68);
        assert_eq!(settings.monitor.ear_threshold, 0.2);
        assert_eq!(settings.monitor.drowsy_frames, 45);
        assert_eq!(settings.monitor.rest_policy, monitor::RestPolicy::ContinueClassification);
        assert_eq!(settings.paths.log_file, PathBuf::from("logs/eye.csv"));
    }

    #[test]
    fn test_preset_sets_base_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "preset = \"strict\"\n[monitor]\near_threshold = 0.3\n").unwrap();

        let settings = AppSettings::load(Some(&path)).unwrap();
        assert_eq!(settings.preset, Preset::Strict);
        assert_eq!(settings.monitor.ear_threshold, 0.3);
        assert_eq!(settings.monitor.drowsy_frames, 30);
        assert_eq!(settings.monitor.distance_threshold_cm, 50.0);
        assert_eq!(settings.report_config().low_blink_z, -1.0);
        assert_eq!(settings.report_config().high_drowsy_z, 1.2);
    }

    #[test]
    fn test_lenient_preset_defaults() {
        let settings = AppSettings::with_preset(Preset::Lenient);
        assert!(settings.validate().is_ok());
        assert_eq!(settings.monitor.drowsy_frames, 90);
        assert_eq!(settings.report.low_blink_z, -2.0);
        assert_eq!(settings.paths.log_file, PathBuf::from("eye_health_log.csv"));
    }

    #[test]
    fn test_unknown_preset_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "preset = \"extreme\"\n").unwrap();
        assert!(matches!(AppSettings::load(Some(&path)), Err(SettingsError::Load(_))));
    }

    #[test]
    fn test_environment_overrides() {
        std::env::set_var("EYE_MONITOR__SESSION__FRAME_QUEUE", "7");
        let settings = AppSettings::load(None);
        std::env::remove_var("EYE_MONITOR__SESSION__FRAME_QUEUE");
        assert_eq!(settings.unwrap().session.frame_queue, 7);
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(matches!(AppSettings::load(Some(&path)), Err(SettingsError::Load(_))));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "[monitor]\nmin_blink_frames = 50\n").unwrap();
        assert!(matches!(AppSettings::load(Some(&path)), Err(SettingsError::Invalid(_))));
    }

    #[test]
    fn test_report_config_follows_interval() {
        let mut settings = AppSettings::default();
        settings.compliance.logging_interval_sec = 30.0;
        assert_eq!(settings.report_config().logging_interval_sec, 30.0);
        assert_eq!(settings.report_config().low_blink_z, -1.5);
    }
}
