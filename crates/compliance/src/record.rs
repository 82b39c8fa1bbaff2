//! Compliance log record

use serde::{Deserialize, Serialize};

/// One summary row per logging interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceRecord {
    /// Timestamp of the frame that closed the window (Unix seconds)
    pub timestamp: f64,

    pub blink_count: u64,

    pub time_in_drowsy_sec: f64,

    /// Mean measured distance; 0 when nothing was measured
    pub avg_distance_cm: f64,

    /// Share of measured frames at a safe distance (0-100)
    pub distance_compliance_pct: f64,

    /// Share of due rest breaks that were completed (0-100)
    #[serde(rename = "twenty_twenty_twenty_compliance_pct")]
    pub rest_compliance_pct: f64,
}

impl ComplianceRecord {
    /// Column names in log order
    pub const COLUMNS: [&'static str; 6] = [
        "timestamp",
        "blink_count",
        "time_in_drowsy_sec",
        "avg_distance_cm",
        "distance_compliance_pct",
        "twenty_twenty_twenty_compliance_pct",
    ];

    /// Blinks per minute over a window of `interval_sec`
    pub fn blink_rate_bpm(&self, interval_sec: f64) -> f64 {
        if interval_sec > 0.0 {
            self.blink_count as f64 / (interval_sec / 60.0)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_column_name() {
        let record = ComplianceRecord {
            timestamp: 1.0,
            blink_count: 4,
            time_in_drowsy_sec: 0.0,
            avg_distance_cm: 55.0,
            distance_compliance_pct: 100.0,
            rest_compliance_pct: 100.0,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("twenty_twenty_twenty_compliance_pct").is_some());
        assert!(json.get("rest_compliance_pct").is_none());
        for column in ComplianceRecord::COLUMNS {
            assert!(json.get(column).is_some(), "missing {}", column);
        }
    }

    #[test]
    fn test_blink_rate() {
        let record = ComplianceRecord {
            timestamp: 0.0,
            blink_count: 5,
            time_in_drowsy_sec: 0.0,
            avg_distance_cm: 0.0,
            distance_compliance_pct: 0.0,
            rest_compliance_pct: 100.0,
        };
        assert_eq!(record.blink_rate_bpm(15.0), 20.0);
        assert_eq!(record.blink_rate_bpm(0.0), 0.0);
    }
}
