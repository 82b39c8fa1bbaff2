//! Frame sources
//!
//! The live detector is an external collaborator; `JsonLinesSource` replays
//! its output from a file with one serialized `LandmarkFrame` per line.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::{LandmarkError, LandmarkFrame};

/// Anything that yields landmark frames in capture order
pub trait FrameSource {
    /// Next frame, or `None` once the source is exhausted
    fn next_frame(&mut self) -> Result<Option<LandmarkFrame>, LandmarkError>;
}

/// Replays frames from JSON lines
pub struct JsonLinesSource<R> {
    reader: R,
    line: usize,
    skipped: usize,
    strict: bool,
    buf: String,
}

impl JsonLinesSource<BufReader<File>> {
    /// Open a replay file
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LandmarkError> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| LandmarkError::Open(format!("{}: {}", path.display(), e)))?;
        info!("Replaying landmark frames from {}", path.display());
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> JsonLinesSource<R> {
    /// Lenient source: malformed lines are skipped with a warning
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            skipped: 0,
            strict: false,
            buf: String::new(),
        }
    }

    /// Fail on the first malformed line instead of skipping it
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Number of malformed lines skipped so far
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl<R: BufRead> FrameSource for JsonLinesSource<R> {
    fn next_frame(&mut self) -> Result<Option<LandmarkFrame>, LandmarkError> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                debug!("Landmark source exhausted after {} lines", self.line);
                return Ok(None);
            }
            self.line += 1;

            let text = self.buf.trim();
            if text.is_empty() {
                continue;
            }

            match serde_json::from_str::<LandmarkFrame>(text) {
                Ok(frame) => return Ok(Some(frame)),
                Err(e) if self.strict => {
                    return Err(LandmarkError::Parse {
                        line: self.line,
                        reason: e.to_string(),
                    });
                }
                Err(e) => {
                    self.skipped += 1;
                    warn!("Skipping malformed frame on line {}: {}", self.line, e);
                }
            }
        }
    }
}
