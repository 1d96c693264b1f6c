// Copyright 2025 Hearing Model Contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `periphery_configuration.toml`. The model crates consume these sections
//! directly as their parameter types.

use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PeripheryConfig {
    pub system: SystemConfig,
    pub stimulus: StimulusConfig,
    pub neurogram: NeurogramConfig,
    pub cochlea: CochleaConfig,
    pub synapse: SynapseConfig,
    pub spikes: SpikeConfig,
}

/// System-level configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Worker threads used by `Neurogram::create` (0 = all available cores)
    pub max_threads: usize,
    pub log_level: String,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            max_threads: 0, // 0 = auto-detect
            log_level: "info".to_string(),
        }
    }
}

/// Stimulus decoding configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StimulusConfig {
    /// Target sampling rate (Hz) when a recorded stimulus is resampled
    pub resample_rate: u32,
}

impl Default for StimulusConfig {
    fn default() -> Self {
        Self {
            resample_rate: 100_000,
        }
    }
}

/// Placement of characteristic frequencies across neurogram channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CfSpacing {
    /// Log-spaced between `min_cf` and `max_cf`
    Logarithmic,
    /// First N entries of the Bark band table
    Bark,
}

/// Neurogram construction configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NeurogramConfig {
    /// Default bin width in seconds (can be changed per neurogram)
    pub bin_width: f64,
    pub min_cf: f64,
    pub max_cf: f64,
    pub spacing: CfSpacing,
    /// Top-level seed; every (channel, repetition) stream is derived from it
    pub seed: u64,
}

impl Default for NeurogramConfig {
    fn default() -> Self {
        Self {
            bin_width: 1e-5,
            min_cf: 250.0,
            max_cf: 16e3,
            spacing: CfSpacing::Logarithmic,
            seed: 42,
        }
    }
}

/// Species whose cochlear tuning and middle ear are simulated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    Cat,
    /// Human with Shera et al. (2002) tuning
    HumanShera,
    /// Human with Glasberg & Moore (1990) tuning
    HumanGlasbergMoore,
}

impl Species {
    pub fn is_human(self) -> bool {
        !matches!(self, Species::Cat)
    }

    /// Valid characteristic frequency range (Hz) for this species
    pub fn cf_range(self) -> (f64, f64) {
        if self.is_human() {
            (124.9, 20001.0)
        } else {
            (124.9, 40e3)
        }
    }
}

/// Cochlear (filter stage + hair cell) configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CochleaConfig {
    pub species: Species,
    /// Outer hair cell health (0 = fully impaired, 1 = normal)
    pub cohc: f64,
    /// Inner hair cell health (0 = fully impaired, 1 = normal)
    pub cihc: f64,
}

impl Default for CochleaConfig {
    fn default() -> Self {
        Self {
            species: Species::Cat,
            cohc: 1.0,
            cihc: 1.0,
        }
    }
}

/// Power-law adaptation implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerLawImplementation {
    /// IIR cascade approximation (fast)
    Approximate,
    /// Exact power-law kernel convolution (quadratic in stimulus length)
    Actual,
}

/// Fractional Gaussian noise added to the synapse drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseMode {
    Disabled,
    /// Noise seeded from (seed, channel); identical across repetitions and runs
    Frozen,
}

/// IHC/AN synapse configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SynapseConfig {
    /// Spontaneous firing rate (spikes/s)
    pub spont: f64,
    pub power_law: PowerLawImplementation,
    pub noise: NoiseMode,
}

impl Default for SynapseConfig {
    fn default() -> Self {
        Self {
            spont: 100.0,
            power_law: PowerLawImplementation::Approximate,
            noise: NoiseMode::Frozen,
        }
    }
}

/// Spike generator selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpikeModel {
    /// Renewal process with absolute + smoothly recovering relative refractoriness
    Renewal,
    /// Stochastic multi-site vesicle release
    ReleaseSites,
}

/// Spike generation configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SpikeConfig {
    pub model: SpikeModel,
    /// Absolute refractory period (s)
    pub abs_refractory: f64,
    /// Baseline mean relative refractory period (s)
    pub rel_refractory: f64,
}

impl Default for SpikeConfig {
    fn default() -> Self {
        Self {
            model: SpikeModel::Renewal,
            abs_refractory: 0.6e-3,
            rel_refractory: 0.6e-3,
        }
    }
}
