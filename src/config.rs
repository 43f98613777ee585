//! Configuration for the snap sorter
//!
//! A [`Config`] is built once before the walk and never changes afterwards.
//! Values come from, in increasing precedence: home-relative defaults, an
//! optional TOML file, and explicit command-line paths.

use crate::classify::OutputLayout;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default source directory, relative to the home directory
pub const DEFAULT_SOURCE_DIR: &str = "Pictures";

/// Default destination directory, relative to the home directory
pub const DEFAULT_DEST_DIR: &str = "Desktop/organizer";

/// Configuration for the snap sorter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Root of the tree to organize
    pub source_dir: PathBuf,

    /// Root under which `output/` and `error/` are created
    pub dest_dir: PathBuf,

    /// Dry run mode - classify and log, but copy nothing
    pub dry_run: bool,

    /// Carry the source modification time over to each copy
    pub preserve_mtime: bool,

    /// Where to write the JSON run report, if anywhere
    pub report: Option<PathBuf>,
}

/// Settings read from a configuration file; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub source_dir: Option<PathBuf>,
    pub dest_dir: Option<PathBuf>,
    pub dry_run: Option<bool>,
    pub preserve_mtime: Option<bool>,
    pub report: Option<PathBuf>,
}

impl ConfigFile {
    /// Load settings from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

impl Config {
    /// Defaults rooted at the given home directory
    pub fn with_home(home: &Path) -> Self {
        Self {
            source_dir: home.join(DEFAULT_SOURCE_DIR),
            dest_dir: home.join(DEFAULT_DEST_DIR),
            dry_run: false,
            preserve_mtime: true,
            report: None,
        }
    }

    /// Build the configuration
    ///
    /// `paths` are the explicit source and destination roots; when given
    /// they replace both directories wholesale. The home directory is only
    /// consulted when a directory is still unset.
    pub fn resolve(
        paths: Option<(PathBuf, PathBuf)>,
        file: ConfigFile,
        home: impl FnOnce() -> Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let (source_dir, dest_dir) = match (paths, file.source_dir, file.dest_dir) {
            (Some(paths), _, _) => paths,
            (None, Some(source), Some(dest)) => (source, dest),
            (None, source, dest) => {
                let home = home().ok_or(ConfigError::NoHomeDirectory)?;
                (
                    source.unwrap_or_else(|| home.join(DEFAULT_SOURCE_DIR)),
                    dest.unwrap_or_else(|| home.join(DEFAULT_DEST_DIR)),
                )
            }
        };

        Ok(Self {
            source_dir,
            dest_dir,
            dry_run: file.dry_run.unwrap_or(false),
            preserve_mtime: file.preserve_mtime.unwrap_or(true),
            report: file.report,
        })
    }

    /// Output roots under the destination directory
    pub fn layout(&self) -> OutputLayout {
        OutputLayout::under(&self.dest_dir)
    }

    /// Generate a sample configuration file content
    pub fn sample_config() -> String {
        r#"# Snap Sorter Configuration File
# This file uses TOML format (https://toml.io)
# Every setting is optional. Paths given on the command line win.

# Directory tree to organize (default: ~/Pictures)
source_dir = "/home/me/Pictures"

# Destination root (default: ~/Desktop/organizer)
# Recognized media lands in <dest_dir>/output/YYYY-MM/
# Unrecognized files land in <dest_dir>/error/
dest_dir = "/home/me/Desktop/organizer"

# Dry run mode - show what would be done without copying anything
dry_run = false

# Give each copy the modification time of its source
preserve_mtime = true

# Write a JSON report of every file and where it went
# report = "/home/me/Desktop/organizer/report.json"
"#
        .to_string()
    }
}

/// Locate the current user's home directory
pub fn home_dir() -> Option<PathBuf> {
    let from_env = |key: &str| {
        std::env::var_os(key)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    };

    from_env("HOME")
        .or_else(|| if cfg!(windows) { from_env("USERPROFILE") } else { None })
        .or_else(passwd_home)
}

#[cfg(unix)]
fn passwd_home() -> Option<PathBuf> {
    nix::unistd::User::from_uid(nix::unistd::getuid())
        .ok()
        .flatten()
        .map(|user| user.dir)
}

#[cfg(not(unix))]
fn passwd_home() -> Option<PathBuf> {
    None
}

/// Errors that can occur when building the configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read configuration file
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse configuration file
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// No home directory to derive default paths from
    NoHomeDirectory,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError { path, source } => {
                write!(f, "Failed to read config file '{}': {}", path.display(), source)
            }
            ConfigError::ParseError { path, source } => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), source)
            }
            ConfigError::NoHomeDirectory => {
                write!(f, "Cannot determine the home directory for default paths")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::ReadError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
            ConfigError::NoHomeDirectory => None,
        }
    }
}
