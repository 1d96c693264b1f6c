// Copyright 2025 Hearing Model Contributors
// SPDX-License-Identifier: Apache-2.0

//! # hearing-observability
//!
//! Logging initialisation shared by every crate of the hearing model, with
//! per-crate debug flag support.
//!
//! ## Features
//! - `file-logging`: JSON log files per run, in addition to console output

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod config;
pub mod init;

// Re-export commonly used items
pub use cli::*;
pub use config::*;
pub use init::*;

/// Known workspace crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "hearing-model",
    "hearing-config",
    "hearing-periphery-model",
    "hearing-periphery-neurogram",
];

/// Tracing target for a crate name (`hearing-periphery-model` -> `hearing_periphery_model`)
pub fn crate_target(crate_name: &str) -> String {
    crate_name.replace('-', "_")
}
