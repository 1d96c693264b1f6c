// Copyright 2025 Hearing Model Contributors
// SPDX-License-Identifier: Apache-2.0

//! Logging initialisation
//!
//! Console output always; with the `file-logging` feature and
//! [`LogOutput::Directory`], JSON files per run and per crate as well.

use anyhow::{Context, Result};
use chrono::{NaiveDateTime, Utc};
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;
use crate::config::{LogFormat, LogOutput, LoggingConfig};

const RUN_PREFIX: &str = "run_";
const RUN_TIMESTAMP: &str = "%Y%m%d_%H%M%S";

/// Logging initialization result
///
/// Dropping the guard flushes any file writers.
pub struct LoggingGuard {
    #[cfg(feature = "file-logging")]
    _file_guards: Vec<tracing_appender::non_blocking::WorkerGuard>,
    log_dir: Option<PathBuf>,
}

impl LoggingGuard {
    /// Run folder receiving log files, if file logging is active
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Initialize logging
///
/// With [`LogOutput::Directory`] a timestamped folder is created:
/// ```text
/// <dir>/
///   └── run_20250101_120000/
///       ├── hearing-periphery-model.log
///       ├── hearing-periphery-neurogram.log
///       └── hearing.log (combined)
/// ```
///
/// # Errors
///
/// Fails if a global subscriber is already installed, if the log folder
/// cannot be created, or if file output is requested without the
/// `file-logging` feature.
pub fn init_logging(debug_flags: &CrateDebugFlags, config: &LoggingConfig) -> Result<LoggingGuard> {
    let filter = debug_flags.to_filter_string(&config.level);
    let env_filter = EnvFilter::try_new(&filter)
        .with_context(|| format!("Invalid log filter: {}", filter))?;

    let mut layers: Vec<BoxedLayer> = Vec::new();

    // Console layer
    let console_layer: BoxedLayer = match config.format {
        LogFormat::Text => tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_filter(env_filter.clone())
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_filter(env_filter.clone())
            .boxed(),
    };
    layers.push(console_layer);

    let guard = match &config.output {
        LogOutput::Stdout => LoggingGuard {
            #[cfg(feature = "file-logging")]
            _file_guards: Vec::new(),
            log_dir: None,
        },
        LogOutput::Directory(base) => {
            file_layers(base, config.retention_runs, &env_filter, &mut layers)?
        }
    };

    Registry::default()
        .with(layers)
        .try_init()
        .context("A global tracing subscriber is already installed")?;

    Ok(guard)
}

/// Initialize console logging at `system.log_level`
pub fn init_logging_for_system(
    debug_flags: &CrateDebugFlags,
    system: &hearing_config::SystemConfig,
) -> Result<LoggingGuard> {
    init_logging(debug_flags, &LoggingConfig::from(system))
}

/// Initialize console logging at the default base level
pub fn init_logging_default(debug_flags: &CrateDebugFlags) -> Result<LoggingGuard> {
    init_logging(debug_flags, &LoggingConfig::default())
}

#[cfg(feature = "file-logging")]
fn file_layers(
    base_log_dir: &Path,
    retention_runs: usize,
    env_filter: &EnvFilter,
    layers: &mut Vec<BoxedLayer>,
) -> Result<LoggingGuard> {
    use tracing_appender::rolling;

    let run_folder = create_run_folder(base_log_dir)?;
    cleanup_old_logs(base_log_dir, retention_runs)?;

    let mut file_guards = Vec::new();

    // One file per crate
    for crate_name in crate::KNOWN_CRATES {
        let file_appender = rolling::never(&run_folder, format!("{}.log", crate_name));
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        file_guards.push(guard);

        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .json()
            .with_filter(EnvFilter::new(format!(
                "{}=debug",
                crate::crate_target(crate_name)
            )))
            .boxed();
        layers.push(file_layer);
    }

    // Combined log file
    let combined_appender = rolling::never(&run_folder, "hearing.log");
    let (combined_non_blocking, combined_guard) = tracing_appender::non_blocking(combined_appender);
    file_guards.push(combined_guard);

    let combined_layer = tracing_subscriber::fmt::layer()
        .with_writer(combined_non_blocking)
        .with_ansi(false)
        .with_target(true)
        .json()
        .with_filter(env_filter.clone())
        .boxed();
    layers.push(combined_layer);

    Ok(LoggingGuard {
        _file_guards: file_guards,
        log_dir: Some(run_folder),
    })
}

#[cfg(not(feature = "file-logging"))]
fn file_layers(
    _base_log_dir: &Path,
    _retention_runs: usize,
    _env_filter: &EnvFilter,
    _layers: &mut Vec<BoxedLayer>,
) -> Result<LoggingGuard> {
    anyhow::bail!("File logging requires the `file-logging` feature")
}

/// Create `<base>/run_<timestamp>` and return its path
pub fn create_run_folder(base_log_dir: &Path) -> Result<PathBuf> {
    let timestamp = Utc::now().format(RUN_TIMESTAMP);
    let run_folder = base_log_dir.join(format!("{}{}", RUN_PREFIX, timestamp));
    std::fs::create_dir_all(&run_folder)
        .with_context(|| format!("Failed to create log directory: {}", run_folder.display()))?;
    Ok(run_folder)
}

/// Remove all but the `retention_runs` most recent run folders
///
/// Returns the number of folders removed. Folders whose name does not
/// carry a run timestamp are left alone.
pub fn cleanup_old_logs(base_log_dir: &Path, retention_runs: usize) -> Result<usize> {
    if !base_log_dir.exists() {
        return Ok(0);
    }

    let mut runs: Vec<(PathBuf, NaiveDateTime)> = Vec::new();
    for entry in std::fs::read_dir(base_log_dir)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        let stamp = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_prefix(RUN_PREFIX))
            .and_then(|s| NaiveDateTime::parse_from_str(s, RUN_TIMESTAMP).ok());
        if let Some(dt) = stamp {
            runs.push((path, dt));
        }
    }

    // Oldest first
    runs.sort_by_key(|(_, dt)| *dt);

    let excess = runs.len().saturating_sub(retention_runs);
    let mut removed = 0;
    for (path, _) in runs.iter().take(excess) {
        match std::fs::remove_dir_all(path) {
            Ok(()) => removed += 1,
            Err(e) => tracing::warn!(
                "Failed to remove old log directory {}: {}",
                path.display(),
                e
            ),
        }
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleanup_keeps_most_recent_runs() {
        let dir = tempfile::tempdir().unwrap();
        for stamp in ["20240101_000000", "20240102_000000", "20240103_000000"] {
            std::fs::create_dir_all(dir.path().join(format!("run_{}", stamp))).unwrap();
        }
        std::fs::create_dir_all(dir.path().join("unrelated")).unwrap();

        let removed = cleanup_old_logs(dir.path(), 2).unwrap();

        assert_eq!(removed, 1);
        assert!(!dir.path().join("run_20240101_000000").exists());
        assert!(dir.path().join("run_20240103_000000").exists());
        assert!(dir.path().join("unrelated").exists());
    }

    #[test]
    fn test_cleanup_missing_dir_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let removed = cleanup_old_logs(&dir.path().join("nope"), 1).unwrap();
        assert_eq!(removed, 0);
    }

    #[test]
    fn test_run_folder_created() {
        let dir = tempfile::tempdir().unwrap();
        let run = create_run_folder(dir.path()).unwrap();
        assert!(run.is_dir());
        assert!(run
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(RUN_PREFIX)));
    }
}
