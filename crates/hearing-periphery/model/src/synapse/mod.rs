// Copyright 2025 Hearing Model Contributors
// SPDX-License-Identifier: Apache-2.0

//! # IHC/AN synapse
//!
//! ```text
//! IHC potential ─▶ power-law mapping ─▶ decimate (10 kHz) ─▶ fast/slow power-law adaptation (+ fGn)
//!               ─▶ up-sample ─▶ drive ─▶ vesicle pool ─▶ release rate
//! ```
//!
//! Deterministic for a given input: the only noise source is frozen per
//! channel, so repeated runs reproduce the same rate function and only
//! spike timing varies between repetitions.

mod noise;
mod power_law;
mod vesicle_pool;

pub use noise::{fractional_gaussian_noise, noise_sigma};
pub use power_law::{adapt, delay_points, map_to_power_law, resample_factor, SYNAPSE_RATE};
pub use vesicle_pool::VesiclePool;

use hearing_config::{NoiseMode, PowerLawImplementation, SynapseConfig};
use rand::Rng;
use tracing::trace;

use crate::dsp::upsample_linear;
use crate::error::{ensure_finite, PeripheryError, Result};
use crate::spikes::adapted_rel_refractory;

/// Synapse output of one channel, all at the stimulus sampling rate
#[derive(Debug, Clone, PartialEq)]
pub struct SynapseOutput {
    /// Power-law adapted drive (spikes/s)
    pub drive: Vec<f64>,
    /// Release rate of the vesicle pool (spikes/s)
    pub rate: Vec<f64>,
    /// Mean redocking time of the pool (s)
    pub redocking_time: Vec<f64>,
    pub time_resolution: f64,
    /// Number of release sites of the pool
    pub n_sites: usize,
}

impl SynapseOutput {
    pub fn len(&self) -> usize {
        self.drive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drive.is_empty()
    }

    /// Mean of the drive over the whole output
    pub fn mean_drive(&self) -> f64 {
        if self.drive.is_empty() {
            return 0.0;
        }
        self.drive.iter().sum::<f64>() / self.drive.len() as f64
    }

    /// Analytical mean and variance of the instantaneous discharge rate
    /// with refractoriness, from the drive and the pool's redocking time
    ///
    /// Samples with no drive estimate zero for both.
    pub fn discharge_estimate(
        &self,
        abs_refractory: f64,
        rel_refractory: f64,
    ) -> DischargeEstimate {
        let n_sites = self.n_sites as f64;
        let (mean, variance) = self
            .drive
            .iter()
            .zip(&self.redocking_time)
            .map(|(&s, &t_rd)| {
                if s > 0.0 {
                    let t_rel = adapted_rel_refractory(rel_refractory, s);
                    (
                        s / (s * (abs_refractory + t_rd / n_sites + t_rel) + 1.0),
                        instantaneous_variance(s, t_rd, abs_refractory, t_rel),
                    )
                } else {
                    (0.0, 0.0)
                }
            })
            .unzip();
        DischargeEstimate { mean, variance }
    }
}

/// Per-sample analytical discharge statistics (spikes/s and (spikes/s)^2)
#[derive(Debug, Clone, PartialEq)]
pub struct DischargeEstimate {
    pub mean: Vec<f64>,
    pub variance: Vec<f64>,
}

/// Variance of the discharge rate of a refractory four-site release process
fn instantaneous_variance(s: f64, t_rd: f64, abs_refractory: f64, t_rel: f64) -> f64 {
    let s2 = s * s;
    let s3 = s2 * s;
    let s4 = s3 * s;
    let s5 = s4 * s;
    let s6 = s5 * s;
    let s7 = s6 * s;
    let s8 = s7 * s;
    let trel2 = t_rel * t_rel;
    let t2 = t_rd * t_rd;
    let t3 = t2 * t_rd;
    let t4 = t3 * t_rd;
    let t5 = t4 * t_rd;
    let t6 = t5 * t_rd;
    let t7 = t6 * t_rd;
    let t8 = t7 * t_rd;
    let st4 = (s * t_rd + 4.0).powi(4);
    let ttts3 = (t_rd / 4.0 + abs_refractory + t_rel + 1.0 / s).powi(3);

    let numerator = 11.0 * s7 * t7 / 2.0
        + 3.0 * s8 * t8 / 16.0
        + 12288.0 * s2 * trel2
        + t_rd * (22528.0 * s3 * trel2 + 22528.0 * s)
        + t6 * (3.0 * s8 * trel2 + 82.0 * s6)
        + t5 * (88.0 * s7 * trel2 + 664.0 * s5)
        + t4 * (976.0 * s6 * trel2 + 3392.0 * s4)
        + t3 * (5376.0 * s5 * trel2 + 10624.0 * s3)
        + t2 * (15616.0 * s4 * trel2 + 20992.0 * s2)
        + 12288.0;
    let denominator = s2 * st4 * (3.0 * s2 * t2 + 40.0 * s * t_rd + 48.0) * ttts3;
    numerator / denominator
}

/// Synapse stage of one channel
#[derive(Debug, Clone)]
pub struct Synapse {
    cf: f64,
    tdres: f64,
    spont: f64,
    noise: NoiseMode,
    implementation: PowerLawImplementation,
    pool: VesiclePool,
}

impl Synapse {
    /// # Errors
    /// `InvalidParameter` for a spontaneous rate outside [1e-4, 180]
    pub fn new(cf: f64, tdres: f64, config: &SynapseConfig) -> Result<Self> {
        if !(1e-4..=180.0).contains(&config.spont) {
            return Err(PeripheryError::invalid(format!(
                "spont = {} is out of bounds [0.0001, 180]",
                config.spont
            )));
        }
        Ok(Self {
            cf,
            tdres,
            spont: config.spont,
            noise: config.noise,
            implementation: config.power_law,
            pool: VesiclePool::new(config.spont),
        })
    }

    /// Run the synapse over an IHC potential
    ///
    /// `noise_rng` is consumed only when noise is enabled.
    ///
    /// # Errors
    /// `NumericalInstability` on non-finite drive or rate
    pub fn run<R: Rng + ?Sized>(&self, ihc: &[f64], noise_rng: &mut R) -> Result<SynapseOutput> {
        let total = ihc.len();
        let dp = delay_points(self.cf);
        let factor = resample_factor(self.tdres);
        let padded = total + 2 * dp;
        let n = padded.div_ceil(factor);

        let sampled = map_to_power_law(ihc, self.spont, self.cf, self.tdres);
        let noise = match self.noise {
            NoiseMode::Disabled => vec![0.0; n],
            NoiseMode::Frozen => fractional_gaussian_noise(n, self.spont, noise_rng)?,
        };

        let adapted = adapt(&sampled, &noise, n, self.implementation);
        let upsampled = upsample_linear(&adapted, factor, padded);
        let drive = upsampled[dp..dp + total].to_vec();
        ensure_finite("synapse drive", &drive)?;

        let (rate, redocking_time) = self.pool.run(&drive, self.tdres);
        ensure_finite("vesicle pool", &rate)?;

        trace!(cf = self.cf, samples = total, delay_points = dp, "synapse done");

        Ok(SynapseOutput {
            drive,
            rate,
            redocking_time,
            time_resolution: self.tdres,
            n_sites: self.pool.n_sites,
        })
    }
}
