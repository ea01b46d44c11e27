// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Logging initialization for critnet binaries
//!
//! Console output always; with the `file-logging` feature and a log directory, a combined
//! JSON log in a timestamped run folder:
//! ```text
//! ./logs/
//!   └── run_20250101_120000/
//!       └── critnet.log
//! ```

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;

const RUN_PREFIX: &str = "run_";
const RUN_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Keeps file writers alive; logs are flushed when dropped
pub struct LoggingGuard {
    #[cfg(feature = "file-logging")]
    _file_guards: Vec<tracing_appender::non_blocking::WorkerGuard>,
    log_dir: Option<PathBuf>,
}

impl LoggingGuard {
    /// Run folder receiving file logs, if file logging is active
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }
}

/// Initialize logging
///
/// # Arguments
/// * `debug_flags` - Per-crate debug flags for filtering
/// * `default_level` - Level for every target without a debug flag
/// * `log_dir` - Base directory for run folders; `None` disables file output
///
/// `RUST_LOG`, when set, replaces the filter built from the flags.
pub fn init_logging(
    debug_flags: &CrateDebugFlags,
    default_level: &str,
    log_dir: Option<PathBuf>,
) -> Result<LoggingGuard> {
    let filter = debug_flags.to_filter_string_with(default_level);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&filter))
        .with_context(|| format!("Invalid log filter: {}", filter))?;

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_filter(env_filter.clone())
        .boxed();
    let mut layers = vec![console_layer];

    let run_folder = match log_dir {
        Some(base) => Some(prepare_run_folder(&base, Utc::now())?),
        None => None,
    };

    #[cfg(feature = "file-logging")]
    let mut file_guards = Vec::new();

    #[cfg(feature = "file-logging")]
    if let Some(folder) = &run_folder {
        let appender = tracing_appender::rolling::never(folder, "critnet.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        file_guards.push(guard);
        layers.push(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .json()
                .with_filter(env_filter)
                .boxed(),
        );
    }

    #[cfg(not(feature = "file-logging"))]
    if run_folder.is_some() {
        anyhow::bail!("File logging requested but critnet-observability was built without the `file-logging` feature");
    }

    Registry::default()
        .with(layers)
        .try_init()
        .context("A global tracing subscriber is already installed")?;

    Ok(LoggingGuard {
        #[cfg(feature = "file-logging")]
        _file_guards: file_guards,
        log_dir: run_folder,
    })
}

/// Console-only logging at `info`
pub fn init_logging_default(debug_flags: &CrateDebugFlags) -> Result<LoggingGuard> {
    init_logging(debug_flags, "info", None)
}

/// Create `base/run_<timestamp>` and prune old runs.
fn prepare_run_folder(base: &Path, now: DateTime<Utc>) -> Result<PathBuf> {
    let run_folder = base.join(format!(
        "{}{}",
        RUN_PREFIX,
        now.format(RUN_TIMESTAMP_FORMAT)
    ));
    std::fs::create_dir_all(&run_folder)
        .with_context(|| format!("Failed to create log directory: {}", run_folder.display()))?;
    cleanup_old_logs(base, now, 30, 10)?;
    Ok(run_folder)
}

/// Remove run folders older than `retention_days`, then all but the newest `retention_runs`.
fn cleanup_old_logs(
    base_log_dir: &Path,
    now: DateTime<Utc>,
    retention_days: i64,
    retention_runs: usize,
) -> Result<()> {
    if !base_log_dir.exists() {
        return Ok(());
    }
    let cutoff = now - chrono::Duration::days(retention_days);

    let mut runs: Vec<(PathBuf, DateTime<Utc>)> = Vec::new();
    for entry in std::fs::read_dir(base_log_dir)
        .with_context(|| format!("Failed to list {}", base_log_dir.display()))?
    {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        let started = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_prefix(RUN_PREFIX))
            .and_then(|ts| NaiveDateTime::parse_from_str(ts, RUN_TIMESTAMP_FORMAT).ok());
        if let Some(started) = started {
            runs.push((path, started.and_utc()));
        }
    }
    // Newest first
    runs.sort_by(|a, b| b.1.cmp(&a.1));

    for (index, (path, started)) in runs.iter().enumerate() {
        if index >= retention_runs || *started < cutoff {
            if let Err(e) = std::fs::remove_dir_all(path) {
                eprintln!(
                    "Warning: Failed to remove old log directory {}: {}",
                    path.display(),
                    e
                );
            }
        }
    }
    Ok(())
}
