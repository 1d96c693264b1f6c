// Copyright 2025 Hearing Model Contributors
// SPDX-License-Identifier: Apache-2.0

//! # Spike generators
//!
//! Draw one spike train per (channel, repetition) from a [`SynapseOutput`].
//!
//! ## Available models
//! - [`Renewal`]: inhomogeneous renewal process on the pool release rate
//! - [`ReleaseSites`]: stochastic four-site release driven by the power-law drive
//!
//! Generators are stateless and shared across worker threads; each call
//! receives the stream's own RNG.

mod release_sites;
mod renewal;

pub use release_sites::ReleaseSites;
pub use renewal::Renewal;

use hearing_config::{SpikeConfig, SpikeModel};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::error::{PeripheryError, Result};
use crate::synapse::SynapseOutput;

/// Spike times of one fiber, as sample indices in `[0, n_simulation_timesteps)`
#[derive(Debug, Clone, PartialEq)]
pub struct SpikeTrain {
    pub indices: Vec<usize>,
    pub time_resolution: f64,
}

impl SpikeTrain {
    pub fn new(indices: Vec<usize>, time_resolution: f64) -> Self {
        Self {
            indices,
            time_resolution,
        }
    }

    /// Spike times in seconds
    pub fn times(&self) -> Vec<f64> {
        self.indices
            .iter()
            .map(|&i| i as f64 * self.time_resolution)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Point-process model turning a synapse output into spikes
pub trait SpikeGenerator: Send + Sync {
    /// Model name for logging
    fn model_name(&self) -> &'static str;

    /// Draw one spike train
    fn generate(&self, synapse: &SynapseOutput, rng: &mut ChaCha8Rng) -> SpikeTrain;
}

/// Build the configured generator
///
/// # Errors
/// `InvalidParameter` for refractory periods outside [0, 20 ms]
pub fn spike_generator(config: &SpikeConfig, spont: f64) -> Result<Box<dyn SpikeGenerator>> {
    for (name, value) in [
        ("abs_refractory", config.abs_refractory),
        ("rel_refractory", config.rel_refractory),
    ] {
        if !(0.0..=20e-3).contains(&value) {
            return Err(PeripheryError::invalid(format!(
                "{} = {} is out of bounds [0, 0.02]",
                name, value
            )));
        }
    }

    Ok(match config.model {
        SpikeModel::Renewal => Box::new(Renewal::new(config.abs_refractory, config.rel_refractory)),
        SpikeModel::ReleaseSites => Box::new(ReleaseSites::new(
            config.abs_refractory,
            config.rel_refractory,
            spont,
        )),
    })
}

/// Exponential variate with unit mean; never infinite
#[inline]
pub(crate) fn unit_exponential<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    -(1.0 - rng.gen::<f64>()).ln()
}

/// Relative refractory time constant, shortened at high rates
#[inline]
pub(crate) fn adapted_rel_refractory(rel_refractory: f64, rate: f64) -> f64 {
    if rate > 0.0 {
        (rel_refractory * 100.0 / rate).min(rel_refractory)
    } else {
        rel_refractory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_selects_model() {
        let mut config = SpikeConfig::default();
        assert_eq!(spike_generator(&config, 50.0).unwrap().model_name(), "renewal");
        config.model = SpikeModel::ReleaseSites;
        assert_eq!(
            spike_generator(&config, 50.0).unwrap().model_name(),
            "release_sites"
        );
    }

    #[test]
    fn test_factory_rejects_refractory_out_of_range() {
        let config = SpikeConfig {
            abs_refractory: 0.1,
            ..SpikeConfig::default()
        };
        assert!(spike_generator(&config, 50.0).is_err());
    }

    #[test]
    fn test_spike_times() {
        let train = SpikeTrain::new(vec![0, 10, 250], 1e-5);
        let times = train.times();
        assert_eq!(train.len(), 3);
        assert!((times[2] - 2.5e-3).abs() < 1e-15);
    }

    #[test]
    fn test_rel_refractory_adaptation() {
        assert_eq!(adapted_rel_refractory(0.6e-3, 50.0), 0.6e-3);
        assert!((adapted_rel_refractory(0.6e-3, 200.0) - 0.3e-3).abs() < 1e-15);
        assert_eq!(adapted_rel_refractory(0.6e-3, 0.0), 0.6e-3);
    }
}
