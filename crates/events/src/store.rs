//! JSONL journal writer
//!
//! One segment file per UTC day, named `YYYY-MM-DD.jsonl`. An event goes to
//! the segment of the day it was committed, not the day it is written.

use crate::error::EventError;
use crate::event::LedgerEvent;
use crate::reader::EventReader;
use chrono::NaiveDate;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Open day file being appended to
struct Segment {
    day: NaiveDate,
    path: PathBuf,
    writer: BufWriter<File>,
    lines: u64,
}

impl Segment {
    fn open(dir: &Path, day: NaiveDate) -> Result<Self, EventError> {
        let path = segment_path(dir, day);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        debug!(path = %path.display(), "opened journal segment");
        Ok(Self {
            day,
            path,
            writer: BufWriter::new(file),
            lines: 0,
        })
    }

    /// Write one line; it is on disk when this returns
    fn write_line(&mut self, line: &str) -> Result<(), EventError> {
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        self.lines += 1;
        Ok(())
    }

    fn finish(mut self) -> Result<(), EventError> {
        self.writer.flush()?;
        self.writer.get_ref().sync_data()?;
        debug!(path = %self.path.display(), lines = self.lines, "closed journal segment");
        Ok(())
    }
}

fn segment_path(dir: &Path, day: NaiveDate) -> PathBuf {
    dir.join(format!("{}.jsonl", day.format("%Y-%m-%d")))
}

/// Append-only audit journal
///
/// Existing segments are appended to, never truncated, so reopening a
/// directory continues where the previous writer stopped.
pub struct EventStore {
    dir: PathBuf,
    segment: Option<Segment>,
    appended: u64,
}

impl EventStore {
    /// Open (or create) a journal directory
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, EventError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            segment: None,
            appended: 0,
        })
    }

    /// Append an event to the segment of its commit day
    pub fn append(&mut self, event: &LedgerEvent) -> Result<(), EventError> {
        // Serialize first so a bad event never opens or touches a segment
        let line = serde_json::to_string(event)?;
        let day = event.timestamp.date_naive();

        let segment = match self.segment.take() {
            Some(segment) if segment.day == day => segment,
            previous => {
                if let Some(previous) = previous {
                    previous.finish()?;
                }
                Segment::open(&self.dir, day)?
            }
        };
        let segment = self.segment.insert(segment);
        segment.write_line(&line)?;
        self.appended += 1;
        Ok(())
    }

    /// Journal directory
    pub fn base_path(&self) -> &Path {
        &self.dir
    }

    /// Number of events appended through this handle
    pub fn appended(&self) -> u64 {
        self.appended
    }

    /// Segment currently open for appends
    pub fn current_segment(&self) -> Option<&Path> {
        self.segment.as_ref().map(|segment| segment.path.as_path())
    }

    /// All segment files in the directory, oldest day first
    pub fn list_files(&self) -> Result<Vec<PathBuf>, EventError> {
        Ok(EventReader::from_directory(&self.dir)?.files().to_vec())
    }

    /// Flush, sync and close the open segment
    pub fn close(&mut self) -> Result<(), EventError> {
        match self.segment.take() {
            Some(segment) => segment.finish(),
            None => Ok(()),
        }
    }
}

impl Drop for EventStore {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
