//! JSON run report

use crate::config::Config;
use crate::error::Result;
use crate::process::{FileResult, ProcessingStats};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Everything a run did, in processing order
#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub generated_at: DateTime<Local>,
    pub source_dir: &'a Path,
    pub dest_dir: &'a Path,
    pub dry_run: bool,
    pub stats: &'a ProcessingStats,
    pub files: &'a [FileResult],
}

impl<'a> RunReport<'a> {
    pub fn new(config: &'a Config, stats: &'a ProcessingStats, files: &'a [FileResult]) -> Self {
        Self {
            generated_at: Local::now(),
            source_dir: &config.source_dir,
            dest_dir: &config.dest_dir,
            dry_run: config.dry_run,
            stats,
            files,
        }
    }

    /// Write the report as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;

        info!(?path, files = self.files.len(), "Wrote run report");
        Ok(())
    }
}
