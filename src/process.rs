//! Main file organizer
//!
//! Handles the core loop of:
//! - Creating the output and error roots
//! - Walking the source tree
//! - Classifying each file and building its destination
//! - Copying files into place
//!
//! Files are handled one at a time in sorted order. Failing to create a
//! root or to walk the source aborts the run; a file that cannot be copied
//! is logged and counted, and the run moves on.

use crate::classify::{Classification, Destination, OutputLayout, build_destination};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::walk::{FileRecord, walk};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{Level, debug, error, info, span, warn};

/// Result of processing a single file
#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    /// The walked file
    pub record: FileRecord,
    /// How the file was classified
    pub classification: Classification,
    /// Destination path, for files that have one
    pub destination: Option<PathBuf>,
    /// Processing status
    pub status: ProcessingStatus,
    /// Error message (if failed)
    pub error: Option<String>,
}

/// Status of file processing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStatus {
    /// File was copied to its destination
    Copied,
    /// Sidecar file, nothing copied
    Skipped,
    /// Directory creation or copy failed
    Failed,
    /// Dry run - would have been copied
    DryRun,
}

/// Processing statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessingStats {
    pub total_files: usize,
    pub copied: usize,
    pub skipped: usize,
    pub failed: usize,
    pub dry_run: usize,
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, status: ProcessingStatus) {
        match status {
            ProcessingStatus::Copied => self.copied += 1,
            ProcessingStatus::Skipped => self.skipped += 1,
            ProcessingStatus::Failed => self.failed += 1,
            ProcessingStatus::DryRun => self.dry_run += 1,
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Total: {}, Copied: {}, Skipped: {}, Failed: {}, Dry run: {}",
            self.total_files, self.copied, self.skipped, self.failed, self.dry_run
        )
    }
}

/// Organizes a source tree into a destination tree
pub struct Organizer {
    config: Config,
    layout: OutputLayout,
    stats: ProcessingStats,
}

impl Organizer {
    /// Create a new organizer with the given configuration
    pub fn new(config: Config) -> Self {
        let layout = config.layout();
        Self {
            config,
            layout,
            stats: ProcessingStats::new(),
        }
    }

    /// Run the organizing pipeline
    pub fn run(&mut self) -> Result<Vec<FileResult>> {
        let _span = span!(Level::INFO, "organize").entered();

        if !self.config.dry_run {
            for dir in self.layout.roots() {
                create_dir(dir)?;
            }
        }

        info!(source = ?self.config.source_dir, "Scanning source directory...");
        let records = walk(&self.config.source_dir)?;
        info!(count = records.len(), "Found files");
        self.stats.total_files = records.len();

        let results: Vec<FileResult> = records
            .into_iter()
            .map(|record| self.process_record(record))
            .collect();

        info!("{}", self.stats.summary());
        Ok(results)
    }

    fn process_record(&mut self, record: FileRecord) -> FileResult {
        let _file_span = span!(Level::DEBUG, "process_file", path = ?record.relative_path).entered();

        let classification = Classification::of(&record);
        let Some(destination) = build_destination(&record, &classification, &self.layout) else {
            debug!(path = ?record.relative_path, "Skipping sidecar file");
            return self.finish(record, classification, None, ProcessingStatus::Skipped, None);
        };
        let dest_path = destination.path();

        if self.config.dry_run {
            info!(
                source = ?record.path,
                destination = ?dest_path,
                captured = %record.captured,
                "Would copy file"
            );
            return self.finish(record, classification, Some(dest_path), ProcessingStatus::DryRun, None);
        }

        match self.place(&record, &destination) {
            Ok(()) => {
                info!(
                    source = ?record.path,
                    destination = ?dest_path,
                    captured = %record.captured,
                    "Copied file"
                );
                self.finish(record, classification, Some(dest_path), ProcessingStatus::Copied, None)
            }
            Err(e) => {
                error!(source = ?record.path, destination = ?dest_path, error = %e, "Failed to process file");
                self.finish(
                    record,
                    classification,
                    Some(dest_path),
                    ProcessingStatus::Failed,
                    Some(e.to_string()),
                )
            }
        }
    }

    /// Create the destination directory and copy the file into it
    fn place(&self, record: &FileRecord, destination: &Destination) -> Result<()> {
        create_dir(&destination.directory)?;
        let dest_path = destination.path();
        copy_file(&record.path, &dest_path)?;

        if self.config.preserve_mtime {
            let mtime = filetime::FileTime::from_last_modification_time(&fs::metadata(&record.path)?);
            if let Err(e) = filetime::set_file_mtime(&dest_path, mtime) {
                warn!(path = ?dest_path, error = %e, "Failed to preserve modification time");
            }
        }

        Ok(())
    }

    fn finish(
        &mut self,
        record: FileRecord,
        classification: Classification,
        destination: Option<PathBuf>,
        status: ProcessingStatus,
        error: Option<String>,
    ) -> FileResult {
        self.stats.record(status);
        FileResult {
            record,
            classification,
            destination,
            status,
            error,
        }
    }

    /// Get processing statistics reference
    pub fn stats(&self) -> &ProcessingStats {
        &self.stats
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// Create a directory and its parents; succeeds if it already exists
fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|source| Error::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

/// Copy file bytes with buffered I/O, overwriting the destination
///
/// Both handles are released on every path out of this function.
fn copy_file(source: &Path, dest: &Path) -> Result<()> {
    let copy_error = |message: String| Error::Copy {
        from: source.to_path_buf(),
        to: dest.to_path_buf(),
        message,
    };

    let src_file =
        File::open(source).map_err(|e| copy_error(format!("unable to open source file: {e}")))?;
    let dest_file = File::create(dest)
        .map_err(|e| copy_error(format!("unable to create destination file: {e}")))?;

    let mut reader = BufReader::with_capacity(256 * 1024, src_file);
    let mut writer = BufWriter::with_capacity(256 * 1024, dest_file);

    std::io::copy(&mut reader, &mut writer)
        .and_then(|_| writer.flush())
        .map_err(|e| copy_error(format!("error during file copy: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_processing_stats() {
        let mut stats = ProcessingStats::new();
        stats.total_files = 9;
        for _ in 0..5 {
            stats.record(ProcessingStatus::Copied);
        }
        stats.record(ProcessingStatus::Skipped);
        stats.record(ProcessingStatus::Skipped);
        stats.record(ProcessingStatus::Failed);
        stats.record(ProcessingStatus::DryRun);

        let summary = stats.summary();
        assert!(summary.contains("Total: 9"));
        assert!(summary.contains("Copied: 5"));
        assert!(summary.contains("Skipped: 2"));
        assert!(summary.contains("Failed: 1"));
        assert!(summary.contains("Dry run: 1"));
    }

    #[test]
    fn test_copy_file_overwrites() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src.bin");
        let dest = dir.path().join("dest.bin");
        fs::write(&src, b"new contents").unwrap();
        fs::write(&dest, b"old contents that are longer").unwrap();

        copy_file(&src, &dest).unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"new contents");
    }

    #[test]
    fn test_copy_file_missing_source() {
        let dir = tempdir().unwrap();
        let err = copy_file(&dir.path().join("missing"), &dir.path().join("dest")).unwrap_err();
        assert!(err.to_string().contains("unable to open source file"));
        assert!(!dir.path().join("dest").exists());
    }

    #[test]
    fn test_copy_file_missing_dest_dir() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src.bin");
        fs::write(&src, b"x").unwrap();
        let err = copy_file(&src, &dir.path().join("no/such/dir/dest")).unwrap_err();
        assert!(err.to_string().contains("unable to create destination file"));
    }

    #[test]
    fn test_create_dir_is_idempotent() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("a/b/c");
        create_dir(&target).unwrap();
        create_dir(&target).unwrap();
        assert!(target.is_dir());
    }
}
