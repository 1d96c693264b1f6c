// Copyright 2025 Hearing Model Contributors
// SPDX-License-Identifier: Apache-2.0

//! # Stimulus
//!
//! Immutable pressure waveform (pascals) plus its timing metadata.
//!
//! Constructors:
//! - [`Stimulus::ramped_sine_wave`]: synthetic tone with raised-cosine ramps
//! - [`Stimulus::from_file`]: decoded WAV recording, optionally resampled
//! - [`Stimulus::from_samples`]: wrap an existing sample buffer

mod tone;
mod wav;

use crate::error::{PeripheryError, Result};

/// Reference pressure for dB SPL (pascals)
pub const REFERENCE_PRESSURE: f64 = 20e-6;

/// Target rate used by `from_file(.., true)` (Hz)
pub const DEFAULT_RESAMPLE_RATE: u32 = 100_000;

/// Time-domain stimulus
///
/// Invariant: `data().len() == n_simulation_timesteps()` and
/// `n_simulation_timesteps() == round(stimulus_duration() * sampling_rate())`.
#[derive(Debug, Clone, PartialEq)]
pub struct Stimulus {
    data: Vec<f64>,
    sampling_rate: u32,
    stimulus_duration: f64,
    simulation_duration: f64,
}

impl Stimulus {
    /// Wrap a sample buffer (pascals) recorded at `sampling_rate`
    pub fn from_samples(data: Vec<f64>, sampling_rate: u32) -> Result<Self> {
        if sampling_rate == 0 {
            return Err(PeripheryError::invalid("sampling rate must be positive"));
        }
        if data.is_empty() {
            return Err(PeripheryError::invalid("stimulus has no samples"));
        }
        if let Some(i) = data.iter().position(|v| !v.is_finite()) {
            return Err(PeripheryError::invalid(format!(
                "stimulus sample {} is not finite",
                i
            )));
        }
        let duration = data.len() as f64 / sampling_rate as f64;
        Ok(Self {
            data,
            sampling_rate,
            stimulus_duration: duration,
            simulation_duration: duration,
        })
    }

    pub(crate) fn from_parts(
        data: Vec<f64>,
        sampling_rate: u32,
        stimulus_duration: f64,
        simulation_duration: f64,
    ) -> Self {
        Self {
            data,
            sampling_rate,
            stimulus_duration,
            simulation_duration,
        }
    }

    /// Samples in pascals
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Sampling rate in Hz
    pub fn sampling_rate(&self) -> u32 {
        self.sampling_rate
    }

    /// Duration covered by the samples, including leading silence (s)
    pub fn stimulus_duration(&self) -> f64 {
        self.stimulus_duration
    }

    /// Requested analysis window (s), never shorter than `stimulus_duration`
    pub fn simulation_duration(&self) -> f64 {
        self.simulation_duration
    }

    /// Sampling period (s)
    pub fn time_resolution(&self) -> f64 {
        1.0 / self.sampling_rate as f64
    }

    pub fn n_simulation_timesteps(&self) -> usize {
        self.data.len()
    }

    /// RMS pressure (pascals)
    pub fn rms(&self) -> f64 {
        let energy: f64 = self.data.iter().map(|v| v * v).sum();
        (energy / self.data.len() as f64).sqrt()
    }

    /// Copy rescaled so its RMS equals `level_db` dB SPL
    pub fn scaled_to_level(&self, level_db: f64) -> Result<Self> {
        if !level_db.is_finite() {
            return Err(PeripheryError::invalid("level must be finite"));
        }
        let rms = self.rms();
        if rms <= 0.0 {
            return Err(PeripheryError::invalid(
                "cannot rescale a silent stimulus",
            ));
        }
        let gain = REFERENCE_PRESSURE * 10f64.powf(level_db / 20.0) / rms;
        Ok(Self {
            data: self.data.iter().map(|v| v * gain).collect(),
            ..self.clone()
        })
    }

    /// Copy zero-padded with trailing silence up to `simulation_duration`
    pub fn to_simulation_window(&self) -> Self {
        let n = (self.simulation_duration * self.sampling_rate as f64).round() as usize;
        let mut data = self.data.clone();
        if n > data.len() {
            data.resize(n, 0.0);
        }
        let duration = data.len() as f64 / self.sampling_rate as f64;
        Self {
            data,
            sampling_rate: self.sampling_rate,
            stimulus_duration: duration,
            simulation_duration: duration,
        }
    }
}
