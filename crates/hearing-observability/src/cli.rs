// Copyright 2025 Hearing Model Contributors
// SPDX-License-Identifier: Apache-2.0

//! Per-crate debug switches
//!
//! `--debug-hearing-periphery-model` raises one crate to debug level while
//! the rest stay at the configured base level; `--debug-all` raises all.

use std::collections::BTreeSet;

use crate::{crate_target, KNOWN_CRATES};

const FLAG_PREFIX: &str = "--debug-";
const ALL: &str = "all";

/// Crates whose logging is raised to debug level
///
/// ```rust
/// use hearing_observability::CrateDebugFlags;
///
/// let flags = CrateDebugFlags::from_args(vec!["--debug-hearing-config".to_string()]);
/// assert!(flags.is_enabled("hearing-config"));
/// assert_eq!(flags.to_filter_string("warn"), "hearing_config=debug,warn");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrateDebugFlags {
    pub enabled_crates: BTreeSet<String>,
}

impl CrateDebugFlags {
    /// Collect `--debug-<crate>` and `--debug-all` from an argument list;
    /// anything else is ignored
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut flags = Self::default();
        for name in args
            .into_iter()
            .filter_map(|arg| arg.strip_prefix(FLAG_PREFIX).map(str::to_string))
        {
            flags.enable(&name);
        }
        flags
    }

    /// Enable one crate, or every known crate for `"all"`
    pub fn enable(&mut self, crate_name: &str) {
        if crate_name == ALL {
            self.enabled_crates
                .extend(KNOWN_CRATES.iter().map(|c| c.to_string()));
        } else if !crate_name.is_empty() {
            self.enabled_crates.insert(crate_name.to_string());
        }
    }

    pub fn is_enabled(&self, crate_name: &str) -> bool {
        self.enabled_crates.contains(crate_name)
    }

    pub fn any_enabled(&self) -> bool {
        !self.enabled_crates.is_empty()
    }

    /// `DEBUG` for enabled crates, `INFO` for the rest
    pub fn level_for(&self, crate_name: &str) -> tracing::Level {
        if self.is_enabled(crate_name) {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// `EnvFilter` directive: one `<target>=debug` per enabled crate, then
    /// `base_level`
    pub fn to_filter_string(&self, base_level: &str) -> String {
        self.enabled_crates
            .iter()
            .map(|name| format!("{}=debug", crate_target(name)))
            .chain(std::iter::once(base_level.to_string()))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Flags from the process arguments merged with `HEARING_DEBUG`
///
/// `HEARING_DEBUG` holds comma-separated crate names, or `all`.
pub fn parse_debug_flags() -> CrateDebugFlags {
    let mut flags = CrateDebugFlags::from_args(std::env::args());
    if let Ok(value) = std::env::var("HEARING_DEBUG") {
        merge_env_flags(&mut flags, &value);
    }
    flags
}

fn merge_env_flags(flags: &mut CrateDebugFlags, value: &str) {
    for name in value.split(',').map(str::trim) {
        flags.enable(name);
    }
}

/// Usage text for `--help` output
pub fn debug_flags_help() -> String {
    format!(
        "Debug logging:\n  \
         --debug-all              every crate at debug level\n  \
         --debug-<crate>          one crate at debug level\n  \
         HEARING_DEBUG=a,b | all  same, from the environment\n\n\
         Crates: {}\n",
        KNOWN_CRATES.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_crate_flag() {
        let flags = CrateDebugFlags::from_args(vec![
            "--debug-hearing-config".to_string(),
            "--seed".to_string(),
        ]);
        assert!(flags.is_enabled("hearing-config"));
        assert!(!flags.is_enabled("hearing-periphery-model"));
        assert_eq!(flags.enabled_crates.len(), 1);
    }

    #[test]
    fn test_debug_all_enables_known_crates() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-all".to_string()]);
        assert!(KNOWN_CRATES.iter().all(|c| flags.is_enabled(c)));
        assert!(!flags.is_enabled(ALL));
    }

    #[test]
    fn test_filter_string_uses_targets() {
        let flags =
            CrateDebugFlags::from_args(vec!["--debug-hearing-periphery-model".to_string()]);
        assert_eq!(
            flags.to_filter_string("warn"),
            "hearing_periphery_model=debug,warn"
        );
        assert_eq!(CrateDebugFlags::default().to_filter_string("info"), "info");
    }

    #[test]
    fn test_env_merge() {
        let mut flags = CrateDebugFlags::default();
        merge_env_flags(&mut flags, " hearing-config , ,hearing-model");
        assert!(flags.is_enabled("hearing-config"));
        assert!(flags.is_enabled("hearing-model"));
        assert_eq!(flags.enabled_crates.len(), 2);
        assert_eq!(flags.level_for("hearing-model"), tracing::Level::DEBUG);
        assert_eq!(flags.level_for("hearing-periphery-neurogram"), tracing::Level::INFO);
    }

    #[test]
    fn test_help_lists_crates() {
        let help = debug_flags_help();
        assert!(KNOWN_CRATES.iter().all(|c| help.contains(c)));
    }
}
