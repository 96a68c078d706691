//! JSONL event reader - sequential reader for audits

use crate::error::EventError;
use crate::event::LedgerEvent;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Sequential journal reader
pub struct EventReader {
    files: Vec<PathBuf>,
}

impl EventReader {
    /// Create a new reader from a directory.
    ///
    /// A missing directory reads as an empty journal.
    pub fn from_directory(path: impl AsRef<Path>) -> Result<Self, EventError> {
        let path = path.as_ref();
        let mut files = Vec::new();

        if path.exists() {
            for entry in std::fs::read_dir(path)? {
                let file_path = entry?.path();
                if file_path.extension().map_or(false, |ext| ext == "jsonl") {
                    files.push(file_path);
                }
            }
        }

        files.sort();

        Ok(Self { files })
    }

    /// Journal files in read order
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Read all events from all files, ordered by sequence
    pub fn read_all(&self) -> Result<Vec<LedgerEvent>, EventError> {
        let mut events = Vec::new();

        for file_path in &self.files {
            let reader = BufReader::new(File::open(file_path)?);

            for (idx, line) in reader.lines().enumerate() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                let event: LedgerEvent =
                    serde_json::from_str(&line).map_err(|e| EventError::InvalidLine {
                        file: file_path.display().to_string(),
                        line: idx + 1,
                        reason: e.to_string(),
                    })?;
                events.push(event);
            }
        }

        // Subscribers may write slightly out of order across a day boundary
        events.sort_by_key(|e| e.sequence);
        Ok(events)
    }

    /// Count total events across all files
    pub fn count(&self) -> Result<usize, EventError> {
        let mut count = 0;

        for file_path in &self.files {
            let reader = BufReader::new(File::open(file_path)?);
            for line in reader.lines() {
                if !line?.trim().is_empty() {
                    count += 1;
                }
            }
        }

        Ok(count)
    }
}
