//! Incremental CSV export.
//!
//! Each call to [`IncrementalExporter::append_records`] opens the output in
//! append mode, writes, flushes and drops the handle. A run that dies
//! midway leaves every batch written so far intact on disk.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use tracing::{debug, info, warn};

use recfinder_models::{ConversationId, ExportProfile, RecordingRecord};

use crate::error::ExportResult;

/// Appends recording rows to a CSV file, writing the header exactly once.
#[derive(Debug, Clone)]
pub struct IncrementalExporter {
    path: PathBuf,
    profile: ExportProfile,
}

impl IncrementalExporter {
    pub fn new(path: impl Into<PathBuf>, profile: ExportProfile) -> Self {
        Self {
            path: path.into(),
            profile,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn profile(&self) -> ExportProfile {
        self.profile
    }

    /// Whether the next append has to start with a header row.
    fn needs_header(&self) -> bool {
        fs::metadata(&self.path).map(|m| m.len() == 0).unwrap_or(true)
    }

    /// Whether a non-empty file ends mid-row, as left by an interrupted
    /// write.
    fn ends_without_newline(&self) -> ExportResult<bool> {
        let mut file = File::open(&self.path)?;
        if file.metadata()?.len() == 0 {
            return Ok(false);
        }
        file.seek(SeekFrom::End(-1))?;
        let mut last = [0u8; 1];
        file.read_exact(&mut last)?;
        Ok(last[0] != b'\n')
    }

    /// Append one row per record, in order. Returns the number of rows
    /// written.
    ///
    /// A new or empty file receives the header first, even when `records`
    /// is empty.
    pub fn append_records(
        &self,
        conversation_id: &ConversationId,
        records: &[RecordingRecord],
    ) -> ExportResult<usize> {
        let write_header = self.needs_header();
        let repair_newline = !write_header && self.ends_without_newline()?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        if repair_newline {
            warn!(path = %self.path.display(), "Output ends mid-row, terminating it before appending");
            file.write_all(b"\n")?;
        }
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

        if write_header {
            debug!(path = %self.path.display(), profile = %self.profile, "Writing CSV header");
            writer.write_record(self.profile.header())?;
        }

        for record in records {
            writer.write_record(self.profile.row(record))?;
        }
        writer.flush()?;

        if !records.is_empty() {
            info!(
                conversation_id = %conversation_id,
                rows = records.len(),
                path = %self.path.display(),
                "Appended recordings"
            );
        }

        Ok(records.len())
    }
}
