//! Plain-text rendering of a log summary

use std::fmt;

use chrono::{DateTime, Utc};
use compliance::{LogSummary, RiskLevel};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Printable review report
pub struct Report<'a>(pub &'a LogSummary);

fn format_time(time: Option<DateTime<Utc>>) -> String {
    time.map_or_else(|| "?".to_string(), |t| t.format(DATE_FORMAT).to_string())
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.0;
        writeln!(f, "=== Eye Health Report ===")?;

        if summary.is_empty() {
            return writeln!(f, "No records logged yet. Run the monitor to collect data.");
        }

        writeln!(
            f,
            "Records: {} ({} to {} UTC)",
            summary.record_count,
            format_time(summary.first_datetime()),
            format_time(summary.last_datetime())
        )?;
        writeln!(f, "Combined compliance: {:.1}%", summary.combined_compliance_pct)?;
        writeln!(f, "  Distance compliance: {:.1}%", summary.mean_distance_compliance_pct)?;
        writeln!(f, "  20-20-20 compliance: {:.1}%", summary.mean_rest_compliance_pct)?;
        writeln!(f, "Drowsy time: {:.1} minutes", summary.total_drowsy_minutes)?;
        writeln!(f, "Average blink rate: {:.1} BPM", summary.avg_blink_rate_bpm)?;
        writeln!(
            f,
            "Risk levels: {} low, {} medium, {} high",
            summary.count_at(RiskLevel::Low),
            summary.count_at(RiskLevel::Medium),
            summary.count_at(RiskLevel::High)
        )?;

        if summary.high_risk_periods.is_empty() {
            return writeln!(f, "No high-risk periods detected.");
        }

        writeln!(f, "High-risk periods: {}", summary.high_risk_periods.len())?;
        for (i, period) in summary.high_risk_periods.iter().enumerate() {
            writeln!(
                f,
                "  #{} {} to {} ({:.0}s, {} records): {:.1} BPM, {:.1}s drowsy per record",
                i + 1,
                format_time(compliance::to_datetime(period.start)),
                format_time(compliance::to_datetime(period.end)),
                period.duration_sec(),
                period.records,
                period.avg_blink_rate_bpm,
                period.avg_drowsy_sec
            )?;
        }
        writeln!(f, "Review the log around these times.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compliance::{ComplianceRecord, ReportConfig};

    fn record(timestamp: f64, blinks: u64, drowsy: f64) -> ComplianceRecord {
        ComplianceRecord {
            timestamp,
            blink_count: blinks,
            time_in_drowsy_sec: drowsy,
            avg_distance_cm: 58.0,
            distance_compliance_pct: 90.0,
            rest_compliance_pct: 100.0,
        }
    }

    #[test]
    fn test_empty_report() {
        let summary = LogSummary::from_records(&[], &ReportConfig::default());
        let text = Report(&summary).to_string();
        assert!(text.contains("No records"));
    }

    #[test]
    fn test_report_lists_periods() {
        let start = 1_700_000_000.0;
        let mut records: Vec<_> = (0..40).map(|i| record(start + i as f64 * 15.0, 5, 0.0)).collect();
        records[20].blink_count = 0;
        records[20].time_in_drowsy_sec = 14.0;

        let summary = LogSummary::from_records(&records, &ReportConfig::default());
        let text = Report(&summary).to_string();
        assert!(text.contains("Records: 40 (2023-11-14 22:13 to"));
        assert!(text.contains("Combined compliance: 94.0%"));
        assert!(text.contains("High-risk periods: 1"));
    }
}
