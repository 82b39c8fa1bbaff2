//! In-memory record log

use std::collections::VecDeque;
use std::sync::Mutex;

use compliance::ComplianceRecord;
use tracing::{debug, info};

use crate::{RecordSink, StorageError};

/// Default retention: one day of 15 s records
const DEFAULT_MAX_RECORDS: usize = 5_760;

/// Bounded in-memory log; the oldest records are dropped first
pub struct MemoryLog {
    records: Mutex<VecDeque<ComplianceRecord>>,
    max_records: usize,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_RECORDS)
    }

    /// Create a log retaining at most `max_records`
    pub fn with_capacity(max_records: usize) -> Self {
        info!("Creating in-memory compliance log (max {} records)", max_records);
        Self {
            records: Mutex::new(VecDeque::with_capacity(max_records.min(1024))),
            max_records: max_records.max(1),
        }
    }

    /// All retained records, oldest first
    pub fn records(&self) -> Result<Vec<ComplianceRecord>, StorageError> {
        Ok(self.lock()?.iter().cloned().collect())
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut records) = self.records.lock() {
            records.clear();
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, VecDeque<ComplianceRecord>>, StorageError> {
        self.records
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))
    }
}

impl Default for MemoryLog {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordSink for MemoryLog {
    fn append(&self, record: &ComplianceRecord) -> Result<(), StorageError> {
        let mut records = self.lock()?;
        while records.len() >= self.max_records {
            records.pop_front();
        }
        records.push_back(record.clone());
        debug!("Stored record at {:.3} ({} retained)", record.timestamp, records.len());
        Ok(())
    }
}
