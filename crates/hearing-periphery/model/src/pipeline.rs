// Copyright 2025 Hearing Model Contributors
// SPDX-License-Identifier: Apache-2.0

//! Single-channel periphery pipeline
//!
//! [`PeripheryModel`] bundles the configured stages. It holds no per-run
//! state, so one instance serves every channel and repetition in parallel:
//!
//! 1. [`PeripheryModel::prepare`] once per stimulus (middle ear)
//! 2. [`PeripheryModel::channel_response`] once per channel (filter, IHC, synapse)
//! 3. [`PeripheryModel::spike_train`] once per (channel, repetition)

use std::fmt;

use hearing_config::{CochleaConfig, PeripheryConfig, SpikeConfig, SynapseConfig};
use tracing::trace;

use crate::cochlea::{inner_hair_cell, middle_ear, PeripheralFilter};
use crate::error::Result;
use crate::seed::{stream_rng, NOISE_STREAM};
use crate::spikes::{spike_generator, SpikeGenerator, SpikeTrain};
use crate::stimulus::Stimulus;
use crate::synapse::{DischargeEstimate, Synapse, SynapseOutput};

/// Middle-ear output of a stimulus, shared read-only by all channels
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedStimulus {
    pub middle_ear: Vec<f64>,
    pub time_resolution: f64,
}

impl PreparedStimulus {
    pub fn len(&self) -> usize {
        self.middle_ear.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middle_ear.is_empty()
    }
}

pub struct PeripheryModel {
    cochlea: CochleaConfig,
    synapse: SynapseConfig,
    spikes: SpikeConfig,
    generator: Box<dyn SpikeGenerator>,
    seed: u64,
}

impl fmt::Debug for PeripheryModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PeripheryModel")
            .field("cochlea", &self.cochlea)
            .field("synapse", &self.synapse)
            .field("spikes", &self.spikes)
            .field("generator", &self.generator.model_name())
            .field("seed", &self.seed)
            .finish()
    }
}

impl PeripheryModel {
    /// # Errors
    /// `InvalidParameter` for refractory periods out of range
    pub fn from_config(config: &PeripheryConfig) -> Result<Self> {
        Ok(Self {
            cochlea: config.cochlea.clone(),
            synapse: config.synapse.clone(),
            spikes: config.spikes.clone(),
            generator: spike_generator(&config.spikes, config.synapse.spont)?,
            seed: config.neurogram.seed,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
    }

    pub fn spike_generator(&self) -> &dyn SpikeGenerator {
        self.generator.as_ref()
    }

    /// Run the middle ear
    ///
    /// # Errors
    /// `UnsupportedSamplingRate`, `NumericalInstability`
    pub fn prepare(&self, stimulus: &Stimulus) -> Result<PreparedStimulus> {
        Ok(PreparedStimulus {
            middle_ear: middle_ear(stimulus, self.cochlea.species)?,
            time_resolution: stimulus.time_resolution(),
        })
    }

    /// IHC receptor potential of one channel
    pub fn inner_hair_cell_response(
        &self,
        prepared: &PreparedStimulus,
        cf: f64,
    ) -> Result<Vec<f64>> {
        let filter = PeripheralFilter::new(cf, prepared.time_resolution, &self.cochlea)?;
        let bm = filter.run(&prepared.middle_ear)?;
        inner_hair_cell(&bm, cf, prepared.time_resolution, self.cochlea.cihc)
    }

    /// Deterministic part of the pipeline for one channel
    ///
    /// # Errors
    /// `InvalidParameter` for an out-of-range CF or model parameter,
    /// `NumericalInstability` anywhere in the cascade
    pub fn channel_response(
        &self,
        prepared: &PreparedStimulus,
        cf: f64,
        channel: usize,
    ) -> Result<SynapseOutput> {
        let synapse = Synapse::new(cf, prepared.time_resolution, &self.synapse)?;
        let ihc = self.inner_hair_cell_response(prepared, cf)?;
        let mut noise_rng = stream_rng(self.seed, channel, NOISE_STREAM);
        let out = synapse.run(&ihc, &mut noise_rng)?;
        trace!(channel, cf, "channel response ready");
        Ok(out)
    }

    /// Analytical mean and variance of the discharge rate of a channel,
    /// using the configured refractory periods
    pub fn discharge_estimate(&self, response: &SynapseOutput) -> DischargeEstimate {
        response.discharge_estimate(self.spikes.abs_refractory, self.spikes.rel_refractory)
    }

    /// One stochastic repetition of a channel
    pub fn spike_train(
        &self,
        response: &SynapseOutput,
        channel: usize,
        repetition: usize,
    ) -> SpikeTrain {
        let mut rng = stream_rng(self.seed, channel, repetition as u64);
        self.generator.generate(response, &mut rng)
    }
}
