//! Source tree enumeration
//!
//! Builds one [`FileRecord`] per regular file under the source root, with
//! metadata extracted and capture time resolved for image files. Records
//! come back sorted by relative path so runs over the same tree are
//! reproducible.

use crate::capture::{self, TimeSource};
use crate::error::Result;
use crate::metadata::{self, MetadataMap};
use chrono::{DateTime, Local, NaiveDateTime};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

/// Extensions whose files carry an embedded metadata block
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "heic", "png"];

/// One discovered file
#[derive(Debug, Clone, Serialize)]
pub struct FileRecord {
    /// Base name
    pub name: String,
    /// Lowercased text after the final `.`, empty when there is none
    pub extension: String,
    /// Size in bytes
    pub size: u64,
    /// Path relative to the source root
    #[serde(rename = "input_path")]
    pub relative_path: PathBuf,
    /// Full path of the file
    #[serde(skip)]
    pub path: PathBuf,
    /// Modification time, local
    pub modified: NaiveDateTime,
    /// Resolved capture time
    pub captured: NaiveDateTime,
    pub captured_from: TimeSource,
    /// Extracted metadata, image files only
    #[serde(rename = "exif", skip_serializing_if = "MetadataMap::is_empty")]
    pub metadata: MetadataMap,
}

impl FileRecord {
    fn from_entry(root: &Path, entry: &DirEntry) -> Result<Self> {
        let md = entry.metadata()?;
        let modified = local_time(md.modified()?);
        let name = entry.file_name().to_string_lossy().into_owned();
        let extension = extension_of(&name);
        let relative_path = entry
            .path()
            .strip_prefix(root)
            .unwrap_or(entry.path())
            .to_path_buf();

        let (metadata, resolved) = if is_image(&extension) {
            let metadata = metadata::extract_file(entry.path());
            let resolved = capture::resolve_with_source(&metadata, modified);
            (metadata, resolved)
        } else {
            (
                MetadataMap::new(),
                capture::ResolvedTime {
                    timestamp: modified,
                    source: TimeSource::ModificationTime,
                },
            )
        };

        debug!(
            path = ?relative_path,
            captured = %resolved.timestamp,
            source = ?resolved.source,
            tags = metadata.len(),
            "Recorded file"
        );

        Ok(Self {
            name,
            extension,
            size: md.len(),
            relative_path,
            path: entry.path().to_path_buf(),
            modified,
            captured: resolved.timestamp,
            captured_from: resolved.source,
            metadata,
        })
    }
}

/// Lowercased text after the final `.` of a file name
pub fn extension_of(name: &str) -> String {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default()
}

/// Whether files with this extension get metadata extraction
pub fn is_image(extension: &str) -> bool {
    IMAGE_EXTENSIONS.contains(&extension.to_lowercase().as_str())
}

fn local_time(time: SystemTime) -> NaiveDateTime {
    DateTime::<Local>::from(time).naive_local()
}

/// Enumerate every regular file under `root`
///
/// Any traversal error aborts the whole walk, a partial tree is never
/// returned.
pub fn walk(root: &Path) -> Result<Vec<FileRecord>> {
    let mut records = Vec::new();

    for entry in WalkDir::new(root) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        records.push(FileRecord::from_entry(root, &entry)?);
    }

    records.sort_by(|a, b| {
        a.relative_path
            .as_os_str()
            .as_encoded_bytes()
            .cmp(b.relative_path.as_os_str().as_encoded_bytes())
    });

    info!(?root, count = records.len(), "Walked source tree");
    Ok(records)
}
