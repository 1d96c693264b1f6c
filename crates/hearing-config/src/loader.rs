// Copyright 2025 Hearing Model Contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! This module implements the 3-tier configuration loading system:
//! 1. TOML file (base defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{ConfigError, ConfigResult, NoiseMode, PeripheryConfig, Species, SpikeModel};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration file name searched for when no path is given
pub const CONFIG_FILE_NAME: &str = "periphery_configuration.toml";

/// Find the configuration file
///
/// Search order:
/// 1. `HEARING_CONFIG_PATH` environment variable
/// 2. Current working directory: `./periphery_configuration.toml`
/// 3. Ancestors of the working directory (up to 5 levels)
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("HEARING_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        } else {
            return Err(ConfigError::FileNotFound(format!(
                "Config file specified by HEARING_CONFIG_PATH not found: {}",
                path.display()
            )));
        }
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));
        for ancestor in cwd.ancestors().skip(1).take(5) {
            search_paths.push(ancestor.join(CONFIG_FILE_NAME));
        }
    }

    for path in &search_paths {
        if path.exists() {
            return Ok(path.clone());
        }
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "Configuration file '{}' not found in any of these locations:\n{}\n\nSet HEARING_CONFIG_PATH environment variable to specify custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if config file is not found or contains invalid TOML.
/// Value checks are left to [`crate::validate_config`].
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<PeripheryConfig> {
    let config_file = if let Some(path) = config_path {
        path.to_path_buf()
    } else {
        find_config_file()?
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: PeripheryConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);

    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    Ok(config)
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `HEARING_MAX_THREADS` -> `system.max_threads`
/// - `HEARING_LOG_LEVEL` -> `system.log_level`
/// - `HEARING_SEED` -> `neurogram.seed`
/// - `HEARING_BIN_WIDTH` -> `neurogram.bin_width`
/// - `HEARING_SPECIES` -> `cochlea.species`
/// - `HEARING_SPONT` -> `synapse.spont`
/// - `HEARING_NOISE` -> `synapse.noise`
/// - `HEARING_SPIKE_MODEL` -> `spikes.model`
pub fn apply_environment_overrides(config: &mut PeripheryConfig) {
    let vars: HashMap<String, String> = [
        ("max_threads", "HEARING_MAX_THREADS"),
        ("log_level", "HEARING_LOG_LEVEL"),
        ("seed", "HEARING_SEED"),
        ("bin_width", "HEARING_BIN_WIDTH"),
        ("species", "HEARING_SPECIES"),
        ("spont", "HEARING_SPONT"),
        ("noise", "HEARING_NOISE"),
        ("spike_model", "HEARING_SPIKE_MODEL"),
    ]
    .into_iter()
    .filter_map(|(key, var)| env::var(var).ok().map(|value| (key.to_string(), value)))
    .collect();

    apply_cli_overrides(config, &vars);
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - HashMap of CLI arguments (e.g., `{"seed": "7", "species": "human_shera"}`)
///
/// Values that fail to parse are ignored and the previous value is kept.
pub fn apply_cli_overrides(config: &mut PeripheryConfig, cli_args: &HashMap<String, String>) {
    // System settings
    if let Some(value) = cli_args.get("max_threads") {
        if let Ok(threads) = value.parse::<usize>() {
            config.system.max_threads = threads;
        }
    }
    if let Some(value) = cli_args.get("log_level") {
        config.system.log_level = value.clone();
    }

    // Neurogram settings
    if let Some(value) = cli_args.get("seed") {
        if let Ok(seed) = value.parse::<u64>() {
            config.neurogram.seed = seed;
        }
    }
    if let Some(value) = cli_args.get("bin_width") {
        if let Ok(bin_width) = value.parse::<f64>() {
            config.neurogram.bin_width = bin_width;
        }
    }

    // Model settings
    if let Some(species) = cli_args.get("species").and_then(|v| parse_species(v)) {
        config.cochlea.species = species;
    }
    if let Some(value) = cli_args.get("spont") {
        if let Ok(spont) = value.parse::<f64>() {
            config.synapse.spont = spont;
        }
    }
    if let Some(value) = cli_args.get("noise") {
        match value.to_lowercase().as_str() {
            "disabled" | "off" | "false" | "0" => config.synapse.noise = NoiseMode::Disabled,
            "frozen" | "on" | "true" | "1" => config.synapse.noise = NoiseMode::Frozen,
            _ => {}
        }
    }
    if let Some(value) = cli_args.get("spike_model") {
        match value.to_lowercase().as_str() {
            "renewal" => config.spikes.model = SpikeModel::Renewal,
            "release_sites" => config.spikes.model = SpikeModel::ReleaseSites,
            _ => {}
        }
    }
}

fn parse_species(value: &str) -> Option<Species> {
    match value.to_lowercase().as_str() {
        "cat" | "1" => Some(Species::Cat),
        "human_shera" | "human" | "2" => Some(Species::HumanShera),
        "human_glasberg_moore" | "3" => Some(Species::HumanGlasbergMoore),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[neurogram]
seed = 7
bin_width = 1e-4

[spikes]
model = "release_sites"
"#
        )
        .unwrap();

        let config = load_config(Some(file.path()), None).unwrap();
        assert_eq!(config.neurogram.seed, 7);
        assert_eq!(config.neurogram.bin_width, 1e-4);
        assert_eq!(config.spikes.model, SpikeModel::ReleaseSites);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_config(Some(Path::new("/definitely/not/here.toml")), None);
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = PeripheryConfig::default();
        let mut cli = HashMap::new();
        cli.insert("seed".to_string(), "99".to_string());
        cli.insert("species".to_string(), "human_glasberg_moore".to_string());
        cli.insert("noise".to_string(), "off".to_string());
        cli.insert("max_threads".to_string(), "not-a-number".to_string());

        apply_cli_overrides(&mut config, &cli);

        assert_eq!(config.neurogram.seed, 99);
        assert_eq!(config.cochlea.species, Species::HumanGlasbergMoore);
        assert_eq!(config.synapse.noise, NoiseMode::Disabled);
        // Unparseable values leave the default in place
        assert_eq!(config.system.max_threads, 0);
    }
}
