//! CLI argument parsing with clap

use crate::config::{Config, ConfigError, ConfigFile, home_dir};
use clap::Parser;
use std::path::PathBuf;

/// Snap Sorter - files photos and videos by capture date
///
/// Copies every media file under SOURCE into DEST/output/YYYY-MM/, named
/// after the moment it was captured. Files of unknown type are copied to
/// DEST/error/ as-is; .aae sidecars are skipped. Without arguments,
/// ~/Pictures is sorted into ~/Desktop/organizer.
#[derive(Parser, Debug)]
#[command(name = "snap-sorter")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory tree to organize
    #[arg(value_name = "SOURCE", requires = "dest")]
    pub source: Option<PathBuf>,

    /// Destination root
    #[arg(value_name = "DEST", requires = "source")]
    pub dest: Option<PathBuf>,

    /// Path to configuration file (TOML format)
    #[arg(short = 'C', long, env = "SNAP_SORTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Dry run mode - show what would be done without copying
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Do not carry source modification times over to the copies
    #[arg(long)]
    pub no_preserve_mtime: bool,

    /// Write a JSON report of every processed file
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Also write the log to this file
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Output the log file as JSON
    #[arg(long)]
    pub json_log: bool,
}

impl Cli {
    /// Explicit source and destination, when both were given
    pub fn paths(&self) -> Option<(PathBuf, PathBuf)> {
        Some((self.source.clone()?, self.dest.clone()?))
    }

    /// Build the configuration: defaults, then the config file, then
    /// command-line arguments
    pub fn to_config(&self) -> Result<Config, ConfigError> {
        let file = match &self.config {
            Some(path) => ConfigFile::load_from_file(path)?,
            None => ConfigFile::default(),
        };

        let mut config = Config::resolve(self.paths(), file, home_dir)?;
        if self.dry_run {
            config.dry_run = true;
        }
        if self.no_preserve_mtime {
            config.preserve_mtime = false;
        }
        if let Some(report) = &self.report {
            config.report = Some(report.clone());
        }

        Ok(config)
    }
}
