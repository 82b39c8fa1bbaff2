//! Storage Layer
//!
//! Persists compliance records:
//! - Append-only CSV log shared with the review tools
//! - Bounded in-memory log for embedding and tests

mod csv_log;
mod memory;

pub use csv_log::{ComplianceLog, LogContents};
pub use memory::MemoryLog;

use compliance::ComplianceRecord;
use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Log header is missing column '{0}'")]
    MissingColumn(String),
    #[error("Lock error: {0}")]
    Lock(String),
}

/// Destination for emitted compliance records
pub trait RecordSink: Send + Sync {
    fn append(&self, record: &ComplianceRecord) -> Result<(), StorageError>;
}
