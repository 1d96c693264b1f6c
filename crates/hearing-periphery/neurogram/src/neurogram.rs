// Copyright 2025 Hearing Model Contributors
// SPDX-License-Identifier: Apache-2.0

//! Neurogram state machine
//!
//! `Configured` (channels and bin width set, no matrix) ──create──▶
//! `Populated` (matrix of spike counts) ──create──▶ `Populated` (replaced).
//! A failed `create` leaves the previous state untouched.

use std::time::Instant;

use hearing_config::{validate_config, PeripheryConfig};
use hearing_periphery_model::dsp::hamming;
use hearing_periphery_model::{
    characteristic_frequencies, check_sampling_rate, DischargeEstimate, PeripheryError,
    PeripheryModel, Result, Stimulus, SynapseOutput,
};
use ndarray::Array2;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::binning::{merge_counts, BinLayout};
use crate::pool::run_in_pool;

/// Runs slower than this are reported
const SLOW_RUN_SECS: f64 = 60.0;

#[derive(Debug, Clone)]
struct Populated {
    counts: Array2<f64>,
    expected_rate: Array2<f64>,
    expected_variance: Array2<f64>,
    repetitions: usize,
    bin_width: f64,
}

/// Matrices produced by one `create`
struct Simulated {
    counts: Array2<f64>,
    expected_rate: Array2<f64>,
    expected_variance: Array2<f64>,
}

/// Channel × time-bin matrix of auditory-nerve spike counts
#[derive(Debug, Clone)]
pub struct Neurogram {
    config: PeripheryConfig,
    cfs: Vec<f64>,
    bin_width: f64,
    seed: u64,
    output: Option<Populated>,
}

impl Neurogram {
    /// `n_channels` channels with the default configuration
    ///
    /// # Errors
    /// `InvalidParameter` for zero channels or more than the CF layout allows
    pub fn new(n_channels: usize) -> Result<Self> {
        Self::with_config(n_channels, PeripheryConfig::default())
    }

    /// # Errors
    /// `InvalidParameter` for an invalid configuration or channel count
    pub fn with_config(n_channels: usize, config: PeripheryConfig) -> Result<Self> {
        validate_config(&config).map_err(|e| PeripheryError::InvalidParameter(e.to_string()))?;
        let cfs =
            characteristic_frequencies(n_channels, &config.neurogram, config.cochlea.species)?;
        Ok(Self {
            bin_width: config.neurogram.bin_width,
            seed: config.neurogram.seed,
            config,
            cfs,
            output: None,
        })
    }

    pub fn config(&self) -> &PeripheryConfig {
        &self.config
    }

    /// Characteristic frequency of each channel (Hz), low to high
    pub fn cfs(&self) -> &[f64] {
        &self.cfs
    }

    pub fn n_channels(&self) -> usize {
        self.cfs.len()
    }

    /// Bin width (s) used by the next `create`
    pub fn bin_width(&self) -> f64 {
        self.bin_width
    }

    /// Checked against the stimulus by `create`
    pub fn set_bin_width(&mut self, bin_width: f64) {
        self.bin_width = bin_width;
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
    }

    /// Run the full pipeline and replace the output matrix
    ///
    /// Counts are summed over `repetitions` independent spike trains per
    /// channel.
    ///
    /// # Errors
    /// In order of checking: `InvalidBinWidth`, `InvalidParameter` for zero
    /// repetitions, `UnsupportedSamplingRate`, then any pipeline error.
    pub fn create(&mut self, stimulus: &Stimulus, repetitions: usize) -> Result<()> {
        let layout = BinLayout::new(
            self.bin_width,
            stimulus.time_resolution(),
            stimulus.n_simulation_timesteps(),
        )?;
        if repetitions == 0 {
            return Err(PeripheryError::InvalidParameter(
                "repetitions must be at least 1".to_string(),
            ));
        }
        check_sampling_rate(stimulus.sampling_rate())?;

        let mut model = PeripheryModel::from_config(&self.config)?;
        model.set_seed(self.seed);

        info!(
            channels = self.cfs.len(),
            repetitions,
            samples = stimulus.n_simulation_timesteps(),
            bins = layout.n_bins,
            generator = model.spike_generator().model_name(),
            "Creating neurogram"
        );
        let start = Instant::now();

        let cfs = &self.cfs;
        let simulated = run_in_pool(self.config.system.max_threads, || {
            simulate(&model, cfs, stimulus, layout, repetitions)
        })??;

        let elapsed = start.elapsed().as_secs_f64();
        if elapsed > SLOW_RUN_SECS {
            warn!(
                "Neurogram took {:.1}s for {} channels x {} repetitions",
                elapsed,
                cfs.len(),
                repetitions
            );
        } else {
            debug!("Neurogram created in {:.3}s", elapsed);
        }

        self.output = Some(Populated {
            counts: simulated.counts,
            expected_rate: simulated.expected_rate,
            expected_variance: simulated.expected_variance,
            repetitions,
            bin_width: self.bin_width,
        });
        Ok(())
    }

    /// Spike counts, channels × bins
    ///
    /// # Errors
    /// `NotPopulated` before the first successful `create`
    pub fn get_output(&self) -> Result<&Array2<f64>> {
        self.populated().map(|p| &p.counts)
    }

    /// Analytical mean discharge rate (spikes/s), averaged within each bin
    pub fn expected_rates(&self) -> Result<&Array2<f64>> {
        self.populated().map(|p| &p.expected_rate)
    }

    /// Analytical variance of the discharge rate, averaged within each bin
    pub fn expected_variance(&self) -> Result<&Array2<f64>> {
        self.populated().map(|p| &p.expected_variance)
    }

    /// Repetition count behind the current matrix
    pub fn repetitions(&self) -> Option<usize> {
        self.output.as_ref().map(|p| p.repetitions)
    }

    /// Counts normalised to spikes/s per fiber
    pub fn firing_rates(&self) -> Result<Array2<f64>> {
        let p = self.populated()?;
        let scale = 1.0 / (p.repetitions as f64 * p.bin_width);
        Ok(p.counts.mapv(|c| c * scale))
    }

    /// Hamming-weighted mean firing rate over windows of `window_bins` bins
    /// with 50% overlap, channels × windows
    ///
    /// # Errors
    /// `NotPopulated`, or `InvalidParameter` for a window shorter than 2 bins
    /// or longer than the matrix
    pub fn smoothed_output(&self, window_bins: usize) -> Result<Array2<f64>> {
        let rates = self.firing_rates()?;
        let n_bins = rates.ncols();
        if window_bins < 2 || window_bins > n_bins {
            return Err(PeripheryError::InvalidParameter(format!(
                "smoothing window of {} bins must lie in [2, {}]",
                window_bins, n_bins
            )));
        }

        let window = hamming(window_bins);
        let norm: f64 = window.iter().sum();
        let hop = window_bins / 2;
        let n_windows = (n_bins - window_bins) / hop + 1;

        Ok(Array2::from_shape_fn(
            (rates.nrows(), n_windows),
            |(channel, w)| {
                let start = w * hop;
                window
                    .iter()
                    .enumerate()
                    .map(|(j, weight)| weight * rates[[channel, start + j]])
                    .sum::<f64>()
                    / norm
            },
        ))
    }

    fn populated(&self) -> Result<&Populated> {
        self.output.as_ref().ok_or(PeripheryError::NotPopulated)
    }
}

/// Stage A per channel, then stage B per (channel, repetition)
fn simulate(
    model: &PeripheryModel,
    cfs: &[f64],
    stimulus: &Stimulus,
    layout: BinLayout,
    repetitions: usize,
) -> Result<Simulated> {
    let stage_start = Instant::now();
    let prepared = model.prepare(stimulus)?;

    let responses: Vec<SynapseOutput> = cfs
        .par_iter()
        .enumerate()
        .map(|(channel, &cf)| model.channel_response(&prepared, cf, channel))
        .collect::<Result<Vec<_>>>()?;
    debug!(
        "Stage A (filter, hair cell, synapse): {} channels in {:.3}s",
        cfs.len(),
        stage_start.elapsed().as_secs_f64()
    );

    let stage_start = Instant::now();
    let n_bins = layout.n_bins;
    let rows: Vec<Vec<u32>> = responses
        .par_iter()
        .enumerate()
        .map(|(channel, response)| {
            (0..repetitions)
                .into_par_iter()
                .fold(
                    || vec![0u32; n_bins],
                    |mut acc, repetition| {
                        let train = model.spike_train(response, channel, repetition);
                        layout.accumulate(&mut acc, &train);
                        acc
                    },
                )
                .reduce(|| vec![0u32; n_bins], merge_counts)
        })
        .collect();
    debug!(
        "Stage B (spikes, binning): {} trains in {:.3}s",
        cfs.len() * repetitions,
        stage_start.elapsed().as_secs_f64()
    );

    let estimates: Vec<DischargeEstimate> = responses
        .par_iter()
        .map(|response| model.discharge_estimate(response))
        .collect();
    let bin_mean = |values: &[f64], bin: usize| {
        let start = bin * layout.factor;
        values[start..start + layout.factor].iter().sum::<f64>() / layout.factor as f64
    };

    let shape = (cfs.len(), n_bins);
    Ok(Simulated {
        counts: Array2::from_shape_fn(shape, |(c, b)| rows[c][b] as f64),
        expected_rate: Array2::from_shape_fn(shape, |(c, b)| bin_mean(&estimates[c].mean, b)),
        expected_variance: Array2::from_shape_fn(shape, |(c, b)| {
            bin_mean(&estimates[c].variance, b)
        }),
    })
}
