//! Compliance Aggregation
//!
//! Rolls per-frame monitor output into fixed-interval summary records:
//! - Blink count and time spent drowsy
//! - Mean viewing distance and distance compliance
//! - 20-20-20 rest compliance
//!
//! Also derives the review report (weighted compliance, blink rate and
//! z-score risk flags) from persisted records.

mod aggregator;
mod config;
mod record;
mod report;
mod window;

pub use aggregator::ComplianceAggregator;
pub use config::{ComplianceConfig, ReportConfig};
pub use record::ComplianceRecord;
pub use report::{to_datetime, LogSummary, RiskAssessment, RiskLevel, RiskPeriod};
pub use window::ComplianceWindow;
