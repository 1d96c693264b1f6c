// Copyright 2025 Hearing Model Contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! This module provides validation logic to ensure configuration values are
//! consistent and within the ranges the model is defined for.

use crate::{CfSpacing, ConfigError, ConfigResult, PeripheryConfig};

/// Validation errors that can occur during config validation
#[derive(Debug, Clone)]
pub enum ConfigValidationError {
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },
    MissingRequired {
        field: String,
    },
    InvalidValue {
        field: String,
        reason: String,
    },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange {
                field,
                value,
                min,
                max,
            } => {
                write!(f, "{} = {} is out of bounds [{}, {}]", field, value, min, max)
            }
            Self::MissingRequired { field } => {
                write!(f, "Missing required configuration: {}", field)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// Checks for:
/// - Model parameter bounds (health factors, spont rate, refractory periods)
/// - Characteristic frequency range and ordering
/// - Positive bin width and resample rate
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every violation found
pub fn validate_config(config: &PeripheryConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    validate_model_bounds(config, &mut errors);
    validate_channel_layout(config, &mut errors);
    validate_required_fields(config, &mut errors);

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

fn check_range(
    field: &str,
    value: f64,
    min: f64,
    max: f64,
    errors: &mut Vec<ConfigValidationError>,
) {
    if !(value >= min && value <= max) {
        errors.push(ConfigValidationError::OutOfRange {
            field: field.to_string(),
            value,
            min,
            max,
        });
    }
}

fn validate_model_bounds(config: &PeripheryConfig, errors: &mut Vec<ConfigValidationError>) {
    check_range("cochlea.cohc", config.cochlea.cohc, 0.0, 1.0, errors);
    check_range("cochlea.cihc", config.cochlea.cihc, 0.0, 1.0, errors);
    check_range("synapse.spont", config.synapse.spont, 1e-4, 180.0, errors);
    check_range(
        "spikes.abs_refractory",
        config.spikes.abs_refractory,
        0.0,
        20e-3,
        errors,
    );
    check_range(
        "spikes.rel_refractory",
        config.spikes.rel_refractory,
        0.0,
        20e-3,
        errors,
    );

    if !(config.neurogram.bin_width > 0.0 && config.neurogram.bin_width.is_finite()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "neurogram.bin_width".to_string(),
            reason: "must be positive".to_string(),
        });
    }
    if config.stimulus.resample_rate == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "stimulus.resample_rate".to_string(),
            reason: "must be positive".to_string(),
        });
    }
}

fn validate_channel_layout(config: &PeripheryConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.neurogram.spacing != CfSpacing::Logarithmic {
        return;
    }
    let (lo, hi) = config.cochlea.species.cf_range();
    check_range("neurogram.min_cf", config.neurogram.min_cf, lo, hi, errors);
    check_range("neurogram.max_cf", config.neurogram.max_cf, lo, hi, errors);
    if config.neurogram.min_cf > config.neurogram.max_cf {
        errors.push(ConfigValidationError::InvalidValue {
            field: "neurogram.min_cf".to_string(),
            reason: "must not exceed neurogram.max_cf".to_string(),
        });
    }
}

fn validate_required_fields(config: &PeripheryConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.system.log_level.is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "system.log_level".to_string(),
        });
    }
}
