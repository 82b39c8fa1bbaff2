//! CSV compliance log
//!
//! The header is written once when the file is created and later runs
//! append to it. Reading maps columns by header name, so column order in
//! older files does not matter.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use compliance::ComplianceRecord;
use tracing::{debug, info, warn};

use crate::{RecordSink, StorageError};

/// Records read from a log plus the number of rows that were skipped
#[derive(Debug, Clone, Default)]
pub struct LogContents {
    pub records: Vec<ComplianceRecord>,
    pub skipped_rows: usize,
}

/// Append-only CSV log
#[derive(Debug, Clone)]
pub struct ComplianceLog {
    path: PathBuf,
}

impl ComplianceLog {
    /// Open the log at `path`, writing the header if the file is absent or empty
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let needs_header = match fs::metadata(&path) {
            Ok(meta) => meta.len() == 0,
            Err(_) => true,
        };
        if needs_header {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            let mut file = File::create(&path)?;
            writeln!(file, "{}", ComplianceRecord::COLUMNS.join(","))?;
            info!("Log file initialized at {}", path.display());
        }
        Ok(Self { path })
    }

    /// Reader for an existing log; nothing is created
    pub fn at(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every well-formed record
    ///
    /// A missing file reads as empty. Malformed rows are skipped and counted.
    pub fn read_all(&self) -> Result<LogContents, StorageError> {
        if !self.path.exists() {
            debug!("No log at {}", self.path.display());
            return Ok(LogContents::default());
        }

        let mut reader = BufReader::new(File::open(&self.path)?);
        let mut buf = Vec::new();

        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(LogContents::default());
        }
        let columns = ColumnMap::from_header(String::from_utf8_lossy(&buf).trim_end())?;

        let mut contents = LogContents::default();
        let mut row = 1usize;
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            row += 1;

            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line.trim_end(),
                Err(e) => {
                    warn!("Skipping malformed row {}: not valid UTF-8 ({})", row, e);
                    contents.skipped_rows += 1;
                    continue;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match columns.parse(line) {
                Ok(record) => contents.records.push(record),
                Err(reason) => {
                    warn!("Skipping malformed row {}: {} ({})", row, line, reason);
                    contents.skipped_rows += 1;
                }
            }
        }

        debug!(
            "Read {} records from {} ({} skipped)",
            contents.records.len(),
            self.path.display(),
            contents.skipped_rows
        );
        Ok(contents)
    }
}

impl RecordSink for ComplianceLog {
    fn append(&self, record: &ComplianceRecord) -> Result<(), StorageError> {
        let mut file = OpenOptions::new().append(true).create(true).open(&self.path)?;
        writeln!(
            file,
            "{},{},{},{},{},{}",
            record.timestamp,
            record.blink_count,
            record.time_in_drowsy_sec,
            record.avg_distance_cm,
            record.distance_compliance_pct,
            record.rest_compliance_pct
        )?;
        Ok(())
    }
}

/// Field positions for each record column
struct ColumnMap {
    positions: [usize; 6],
    width: usize,
}

impl ColumnMap {
    fn from_header(header: &str) -> Result<Self, StorageError> {
        let names: Vec<&str> = header.split(',').map(str::trim).collect();
        let mut positions = [0usize; 6];
        for (slot, column) in positions.iter_mut().zip(ComplianceRecord::COLUMNS) {
            *slot = names
                .iter()
                .position(|name| *name == column)
                .ok_or_else(|| StorageError::MissingColumn(column.to_string()))?;
        }
        Ok(Self {
            positions,
            width: names.len(),
        })
    }

    fn parse(&self, line: &str) -> Result<ComplianceRecord, String> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != self.width {
            return Err(format!("expected {} fields, found {}", self.width, fields.len()));
        }

        let float = |slot: usize| -> Result<f64, String> {
            let raw = fields[self.positions[slot]];
            raw.parse::<f64>()
                .map_err(|e| format!("{}: '{}' {}", ComplianceRecord::COLUMNS[slot], raw, e))
        };
        let blink_raw = fields[self.positions[1]];
        let blink_count = blink_raw
            .parse::<u64>()
            .map_err(|e| format!("blink_count: '{}' {}", blink_raw, e))?;

        Ok(ComplianceRecord {
            timestamp: float(0)?,
            blink_count,
            time_in_drowsy_sec: float(2)?,
            avg_distance_cm: float(3)?,
            distance_compliance_pct: float(4)?,
            rest_compliance_pct: float(5)?,
        })
    }
}
