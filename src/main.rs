//! Snap Sorter - files photos and videos by capture date
//!
//! Copies media from a source tree into `output/YYYY-MM/` folders named
//! after the capture time, and unrecognized files into `error/`.

use anyhow::Result;
use clap::Parser;
use snap_sorter::{Cli, Config, Organizer, ProcessingStatus, RunReport};
use std::path::Path;
use tracing::{Level, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> Result<()> {
    // Parse CLI arguments; a wrong path count exits with a usage error
    let cli = Cli::parse();

    // Setup logging
    let _guard = setup_logging(&cli)?;

    info!(version = env!("CARGO_PKG_VERSION"), "Snap Sorter starting");

    let config = match cli.to_config() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if cli.verbose {
        info!(?config, "Configuration loaded");
    }

    validate_config(&config);

    let mut organizer = Organizer::new(config);

    match organizer.run() {
        Ok(results) => {
            let stats = organizer.stats();

            println!("{}", "=".repeat(60));
            println!("Processing complete");
            println!("{}", "=".repeat(60));
            println!("  Total:   {}", stats.total_files);
            println!("  Copied:  {}", stats.copied);
            println!("  Skipped: {}", stats.skipped);
            println!("  Failed:  {}", stats.failed);
            if organizer.config().dry_run {
                println!("  Dry run: {}", stats.dry_run);
            }

            let failed: Vec<_> = results
                .iter()
                .filter(|r| r.status == ProcessingStatus::Failed)
                .collect();
            if !failed.is_empty() {
                println!("{}", "-".repeat(60));
                println!("Failed files: {}", failed.len());
                for result in failed {
                    println!(
                        "  {}: {}",
                        result.record.path.display(),
                        result.error.as_deref().unwrap_or("unknown error")
                    );
                }
            }

            if let Some(path) = &organizer.config().report {
                let report = RunReport::new(organizer.config(), stats, &results);
                if let Err(e) = report.save(path) {
                    error!(path = %path.display(), error = %e, "Failed to write report");
                    eprintln!("Error writing report: {}", e);
                }
            }

            info!("Processing complete");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Processing failed");
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Setup logging: stderr always, plus a log file when requested
fn setup_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let (file_layer, guard) = match &cli.log_file {
        Some(path) => {
            let (writer, guard) = tracing_appender::non_blocking(open_log_file(path)?);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            let layer = if cli.json_log {
                layer.json().boxed()
            } else {
                layer.boxed()
            };
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    Ok(guard)
}

fn open_log_file(log_path: &Path) -> Result<std::fs::File> {
    if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    Ok(std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_path)?)
}

/// Warn about configurations that work but are probably mistakes
fn validate_config(config: &Config) {
    if !config.source_dir.exists() {
        warn!(source = %config.source_dir.display(), "Source directory does not exist");
    }

    if config.dest_dir.starts_with(&config.source_dir) {
        warn!(
            dest = %config.dest_dir.display(),
            source = %config.source_dir.display(),
            "Destination is inside the source tree; later runs will pick up earlier output"
        );
    }
}
