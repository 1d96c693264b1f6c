// Copyright 2025 Hearing Model Contributors
// SPDX-License-Identifier: Apache-2.0

//! Logging configuration types

use hearing_config::SystemConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Base log level (trace, debug, info, warn, error)
    pub level: String,

    /// Console format
    pub format: LogFormat,

    /// Output destination
    pub output: LogOutput,

    /// Keep N most recent run folders when logging to files
    pub retention_runs: usize,
}

/// Log format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogFormat {
    Text,
    Json,
}

/// Log output destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogOutput {
    Stdout,
    /// Console plus JSON files under this base directory (needs `file-logging`)
    Directory(PathBuf),
}

impl LoggingConfig {
    /// Console logging at the given level
    pub fn with_level(level: impl Into<String>) -> Self {
        LoggingConfig {
            level: level.into(),
            ..Default::default()
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            format: LogFormat::Text,
            output: LogOutput::Stdout,
            retention_runs: 10,
        }
    }
}

/// Console logging at `system.log_level`
impl From<&SystemConfig> for LoggingConfig {
    fn from(system: &SystemConfig) -> Self {
        LoggingConfig::with_level(system.log_level.clone())
    }
}
