//! Log review: summary metrics and z-score risk flagging

use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{ComplianceRecord, ReportConfig};

/// Per-record risk level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    #[default]
    Low,
    /// One of the two indicators is anomalous
    Medium,
    /// Low blink rate and high drowsy time together
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Medium => write!(f, "MEDIUM"),
            RiskLevel::High => write!(f, "HIGH"),
        }
    }
}

/// Risk flags for one record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub timestamp: f64,
    pub blink_rate_bpm: f64,
    pub blink_z: f64,
    pub drowsy_z: f64,
    pub low_blink: bool,
    pub high_drowsy: bool,
    pub level: RiskLevel,
}

/// Run of consecutive high-risk records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskPeriod {
    pub start: f64,
    pub end: f64,
    pub records: usize,
    pub avg_blink_rate_bpm: f64,
    pub avg_drowsy_sec: f64,
}

impl RiskPeriod {
    pub fn duration_sec(&self) -> f64 {
        self.end - self.start
    }
}

/// Aggregate view over a compliance log
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogSummary {
    pub record_count: usize,
    pub first_timestamp: Option<f64>,
    pub last_timestamp: Option<f64>,
    pub mean_distance_compliance_pct: f64,
    pub mean_rest_compliance_pct: f64,
    /// Weighted mix of distance and rest compliance
    pub combined_compliance_pct: f64,
    pub total_drowsy_minutes: f64,
    pub avg_blink_rate_bpm: f64,
    pub assessments: Vec<RiskAssessment>,
    pub high_risk_periods: Vec<RiskPeriod>,
}

impl LogSummary {
    /// Summarize records in log order
    pub fn from_records(records: &[ComplianceRecord], config: &ReportConfig) -> Self {
        if records.is_empty() {
            return Self::default();
        }

        let n = records.len() as f64;
        let mean_distance = records.iter().map(|r| r.distance_compliance_pct).sum::<f64>() / n;
        let mean_rest = records.iter().map(|r| r.rest_compliance_pct).sum::<f64>() / n;
        let total_drowsy_sec: f64 = records.iter().map(|r| r.time_in_drowsy_sec).sum();
        let mean_blinks = records.iter().map(|r| r.blink_count as f64).sum::<f64>() / n;
        let avg_blink_rate_bpm = if config.logging_interval_sec > 0.0 {
            mean_blinks / (config.logging_interval_sec / 60.0)
        } else {
            0.0
        };

        let assessments = assess(records, config);
        let high_risk_periods = high_risk_periods(&assessments, records);
        debug!(
            "Summarized {} records, {} high-risk periods",
            records.len(),
            high_risk_periods.len()
        );

        Self {
            record_count: records.len(),
            first_timestamp: records.first().map(|r| r.timestamp),
            last_timestamp: records.last().map(|r| r.timestamp),
            mean_distance_compliance_pct: mean_distance,
            mean_rest_compliance_pct: mean_rest,
            combined_compliance_pct: config.distance_weight * mean_distance
                + config.rest_weight * mean_rest,
            total_drowsy_minutes: total_drowsy_sec / 60.0,
            avg_blink_rate_bpm,
            assessments,
            high_risk_periods,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }

    /// Records at the given level
    pub fn count_at(&self, level: RiskLevel) -> usize {
        self.assessments.iter().filter(|a| a.level == level).count()
    }

    pub fn first_datetime(&self) -> Option<DateTime<Utc>> {
        self.first_timestamp.and_then(to_datetime)
    }

    pub fn last_datetime(&self) -> Option<DateTime<Utc>> {
        self.last_timestamp.and_then(to_datetime)
    }
}

/// Convert Unix seconds to a UTC date-time
pub fn to_datetime(timestamp: f64) -> Option<DateTime<Utc>> {
    if !timestamp.is_finite() {
        return None;
    }
    let secs = timestamp.floor();
    let nanos = ((timestamp - secs) * 1e9).round().min(999_999_999.0) as u32;
    Utc.timestamp_opt(secs as i64, nanos).single()
}

/// Sample mean and standard deviation
fn mean_std(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if values.len() < 2 {
        return (mean, 0.0);
    }
    let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / (n - 1.0);
    (mean, variance.sqrt())
}

fn z_scores(values: &[f64]) -> Vec<f64> {
    let (mean, std_dev) = mean_std(values);
    values
        .iter()
        .map(|v| if std_dev > 0.0 { (v - mean) / std_dev } else { 0.0 })
        .collect()
}

fn assess(records: &[ComplianceRecord], config: &ReportConfig) -> Vec<RiskAssessment> {
    let blink_rates: Vec<f64> = records
        .iter()
        .map(|r| r.blink_rate_bpm(config.logging_interval_sec))
        .collect();
    let drowsy: Vec<f64> = records.iter().map(|r| r.time_in_drowsy_sec).collect();
    let blink_z = z_scores(&blink_rates);
    let drowsy_z = z_scores(&drowsy);

    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let low_blink = blink_z[i] < config.low_blink_z;
            let high_drowsy = drowsy_z[i] > config.high_drowsy_z;
            let level = match (low_blink, high_drowsy) {
                (true, true) => RiskLevel::High,
                (true, false) | (false, true) => RiskLevel::Medium,
                (false, false) => RiskLevel::Low,
            };
            RiskAssessment {
                timestamp: record.timestamp,
                blink_rate_bpm: blink_rates[i],
                blink_z: blink_z[i],
                drowsy_z: drowsy_z[i],
                low_blink,
                high_drowsy,
                level,
            }
        })
        .collect()
}

fn high_risk_periods(assessments: &[RiskAssessment], records: &[ComplianceRecord]) -> Vec<RiskPeriod> {
    let mut periods = Vec::new();
    let mut run: Vec<usize> = Vec::new();

    let mut close = |run: &mut Vec<usize>| {
        if let (Some(&first), Some(&last)) = (run.first(), run.last()) {
            let len = run.len() as f64;
            periods.push(RiskPeriod {
                start: assessments[first].timestamp,
                end: assessments[last].timestamp,
                records: run.len(),
                avg_blink_rate_bpm: run.iter().map(|&i| assessments[i].blink_rate_bpm).sum::<f64>() / len,
                avg_drowsy_sec: run.iter().map(|&i| records[i].time_in_drowsy_sec).sum::<f64>() / len,
            });
        }
        run.clear();
    };

    for (i, assessment) in assessments.iter().enumerate() {
        if assessment.level == RiskLevel::High {
            run.push(i);
        } else {
            close(&mut run);
        }
    }
    close(&mut run);

    periods
}
