//! File classification and destination naming
//!
//! Media files go to `output/<YYYY-MM>/snap-<timestamp>-<name>`, sidecars
//! are dropped, anything else goes to `error/<name>` untouched.

use crate::walk::FileRecord;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Extensions of recognized media files
pub const MEDIA_EXTENSIONS: &[&str] = &["jpg", "jpeg", "heic", "mov", "mp4", "png", "gif"];

/// Extensions of sidecar files, which are never copied
pub const SIDECAR_EXTENSIONS: &[&str] = &["aae"];

/// Directory under the destination root for recognized media
pub const RECOGNIZED_DIR: &str = "output";

/// Directory under the destination root for unrecognized files
pub const ERROR_DIR: &str = "error";

/// What happens to a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "bucket", rename_all = "lowercase")]
pub enum Classification {
    /// Recognized media, filed under a `YYYY-MM` bucket
    Media(String),
    /// Sidecar file, not copied
    Skip,
    /// Unknown type, copied to the error bucket
    Unrecognized,
}

impl Classification {
    /// Classify a record by its extension
    pub fn of(record: &FileRecord) -> Self {
        let ext = record.extension.to_lowercase();
        if MEDIA_EXTENSIONS.contains(&ext.as_str()) {
            Classification::Media(month_bucket(&record.captured))
        } else if SIDECAR_EXTENSIONS.contains(&ext.as_str()) {
            Classification::Skip
        } else {
            Classification::Unrecognized
        }
    }
}

/// `YYYY-MM` bucket name for a timestamp
pub fn month_bucket(timestamp: &NaiveDateTime) -> String {
    timestamp.format("%Y-%m").to_string()
}

/// Lowercase a file name and strip its underscores
pub fn normalize_name(name: &str) -> String {
    name.replace('_', "").to_lowercase()
}

/// `snap-YYYY-MM-DD-HH-MM-SS-<normalized name>`
pub fn media_file_name(captured: &NaiveDateTime, name: &str) -> String {
    format!(
        "snap-{}-{}",
        captured.format("%Y-%m-%d-%H-%M-%S"),
        normalize_name(name)
    )
}

/// The two output roots under a destination root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub recognized: PathBuf,
    pub error: PathBuf,
}

impl OutputLayout {
    pub fn under(dest_root: &Path) -> Self {
        Self {
            recognized: dest_root.join(RECOGNIZED_DIR),
            error: dest_root.join(ERROR_DIR),
        }
    }

    pub fn roots(&self) -> [&Path; 2] {
        [self.recognized.as_path(), self.error.as_path()]
    }
}

/// Where a file will be copied
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Destination {
    pub directory: PathBuf,
    pub file_name: String,
}

impl Destination {
    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }
}

/// Compute the destination of a classified record
///
/// Pure function of its inputs; `None` for skipped files.
pub fn build_destination(
    record: &FileRecord,
    classification: &Classification,
    layout: &OutputLayout,
) -> Option<Destination> {
    match classification {
        Classification::Media(bucket) => Some(Destination {
            directory: layout.recognized.join(bucket),
            file_name: media_file_name(&record.captured, &record.name),
        }),
        Classification::Unrecognized => Some(Destination {
            directory: layout.error.clone(),
            file_name: record.name.clone(),
        }),
        Classification::Skip => None,
    }
}
