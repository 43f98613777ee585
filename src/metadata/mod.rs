//! Embedded image metadata extraction
//!
//! Locates the TIFF-structured metadata block inside an image file, walks
//! its directory tree and returns every registered tag keyed by name.
//!
//! Extraction never fails outright:
//! - no container in the file is the normal, empty result
//! - an unreadable container is logged and yields an empty map
//! - a tag that cannot be decoded is logged and left out, the rest survive

pub mod directory;
pub mod registry;
pub mod tiff;
pub mod value;

#[cfg(test)]
pub(crate) mod fixture;

use directory::{Directory, DirectoryTree};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{trace, warn};
use value::TagValue;

pub use value::Numeric;

/// Tag name to entry; the last occurrence of a name wins
pub type MetadataMap = BTreeMap<String, MetadataEntry>;

/// Errors raised while reading the metadata block
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("metadata block is unreadable: {0}")]
    Container(#[from] exif::Error),

    #[error("tag {tag_id:#06x} has unknown type {type_id}")]
    UnknownType { tag_id: u16, type_id: u16 },

    #[error("tag {tag_id:#06x} cannot be decoded: {reason}")]
    Undecodable { tag_id: u16, reason: &'static str },
}

/// One parsed tag
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataEntry {
    pub ifd_path: &'static str,
    pub fq_ifd_path: String,
    pub ifd_index: usize,
    pub tag_id: u16,
    pub tag_name: String,
    pub tag_type_id: u16,
    pub tag_type_name: &'static str,
    pub unit_count: usize,
    pub value: TagValue,
    pub value_string: String,
}

impl MetadataEntry {
    fn decode(
        dir: &Directory<'_>,
        field: &exif::Field,
        tag_name: String,
    ) -> Result<Self, MetadataError> {
        let tag_id = field.tag.number();
        let (tag_type_id, tag_type_name) = value::type_info(tag_id, &field.value)?;
        let value = value::decode(dir.path, tag_id, &field.value)?;

        Ok(Self {
            ifd_path: dir.path,
            fq_ifd_path: dir.fq_path.clone(),
            ifd_index: dir.index,
            tag_id,
            tag_name,
            tag_type_id,
            tag_type_name,
            unit_count: value::unit_count(&field.value),
            value_string: value.to_string(),
            value,
        })
    }
}

/// Extract all registered tags from a file buffer
pub fn extract(bytes: &[u8]) -> MetadataMap {
    let mut map = MetadataMap::new();

    let Some(block) = tiff::locate(bytes) else {
        trace!("No metadata container found");
        return map;
    };

    let exif = match tiff::read(block) {
        Ok(exif) => exif,
        Err(e) => {
            warn!(error = %e, "Failed to parse metadata directories");
            return map;
        }
    };

    let tree = DirectoryTree::build(exif.fields());
    for dir in tree.iter() {
        for field in &dir.fields {
            let Some(tag_name) = registry::tag_name(field.tag) else {
                continue;
            };
            match MetadataEntry::decode(dir, field, tag_name) {
                Ok(entry) => {
                    map.insert(entry.tag_name.clone(), entry);
                }
                Err(e) => {
                    warn!(
                        fq_ifd_path = %dir.fq_path,
                        tag_id = field.tag.number(),
                        error = %e,
                        "Skipping tag"
                    );
                }
            }
        }
    }

    map
}

/// Read a file and extract its metadata
///
/// A file that cannot be read is logged and treated as having no metadata.
pub fn extract_file(path: &Path) -> MetadataMap {
    match fs::read(path) {
        Ok(bytes) => extract(&bytes),
        Err(e) => {
            warn!(?path, error = %e, "Failed to read file for metadata");
            MetadataMap::new()
        }
    }
}
