//! Snap Sorter - files photos and videos into year-month folders
//!
//! This library walks a source tree and copies each file into a destination
//! tree keyed by when it was captured:
//! - Embedded metadata extraction from image files
//! - Capture time resolution with modification-time fallback
//! - Extension-based classification into media, sidecar and unrecognized
//! - Deterministic, chronologically sortable destination names

pub mod capture;
pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod metadata;
pub mod process;
pub mod report;
pub mod walk;

pub use classify::{Classification, Destination, OutputLayout, build_destination};
pub use cli::Cli;
pub use config::{Config, ConfigError, ConfigFile};
pub use error::{Error, Result};
pub use metadata::{MetadataEntry, MetadataMap, extract};
pub use process::{FileResult, Organizer, ProcessingStats, ProcessingStatus};
pub use report::RunReport;
pub use walk::{FileRecord, walk};
