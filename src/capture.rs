//! Capture time resolution
//!
//! Picks the authoritative capture time from extracted metadata, falling
//! back to the file modification time.

use crate::metadata::MetadataMap;
use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::trace;

/// Metadata tags holding a capture time, in priority order
pub const CAPTURE_TIME_TAGS: [&str; 3] = ["DateTimeOriginal", "DateTime", "DateTimeDigitized"];

/// Textual layout of metadata timestamps
pub const CAPTURE_TIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Where a resolved capture time came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeSource {
    /// Parsed from the named metadata tag
    Metadata(&'static str),
    /// The file modification time
    ModificationTime,
}

/// A capture time together with its source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedTime {
    pub timestamp: NaiveDateTime,
    pub source: TimeSource,
}

/// Parse a metadata timestamp (`YYYY:MM:DD HH:MM:SS`)
///
/// Every field must be zero-padded to its full width; chrono alone would
/// also take `2023:5:14 9:30:0` or a leading sign.
pub fn parse_capture_time(s: &str) -> Option<NaiveDateTime> {
    if !has_capture_time_shape(s) {
        return None;
    }
    NaiveDateTime::parse_from_str(s, CAPTURE_TIME_FORMAT).ok()
}

fn has_capture_time_shape(s: &str) -> bool {
    const SHAPE: &[u8; 19] = b"dddd:dd:dd dd:dd:dd";

    s.len() == SHAPE.len()
        && s.bytes().zip(SHAPE).all(|(b, &expected)| match expected {
            b'd' => b.is_ascii_digit(),
            sep => b == sep,
        })
}

/// Resolve the capture time of a file
///
/// The first tag of [`CAPTURE_TIME_TAGS`] that is present and parses wins.
/// Present tags that fail to parse are passed over.
pub fn resolve_with_source(metadata: &MetadataMap, fallback: NaiveDateTime) -> ResolvedTime {
    for tag in CAPTURE_TIME_TAGS {
        let Some(entry) = metadata.get(tag) else {
            continue;
        };
        match entry.value.as_text().and_then(parse_capture_time) {
            Some(timestamp) => {
                return ResolvedTime {
                    timestamp,
                    source: TimeSource::Metadata(tag),
                };
            }
            None => trace!(tag, value = %entry.value_string, "Unparseable capture time"),
        }
    }

    ResolvedTime {
        timestamp: fallback,
        source: TimeSource::ModificationTime,
    }
}

/// Resolve the capture time, discarding its source
pub fn resolve(metadata: &MetadataMap, fallback: NaiveDateTime) -> NaiveDateTime {
    resolve_with_source(metadata, fallback).timestamp
}
