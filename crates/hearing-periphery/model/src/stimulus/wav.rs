// Copyright 2025 Hearing Model Contributors
// SPDX-License-Identifier: Apache-2.0

//! Recorded stimuli (RIFF/WAVE)

use std::path::Path;

use hearing_config::StimulusConfig;
use hound::{SampleFormat, WavReader};
use tracing::debug;

use super::{Stimulus, DEFAULT_RESAMPLE_RATE};
use crate::dsp::resample;
use crate::error::{PeripheryError, Result};

impl Stimulus {
    /// Decode a WAV file into a stimulus
    ///
    /// Multi-channel audio is mixed down; integer PCM is scaled to [-1, 1]
    /// and read as pascals. With `resample` the waveform is converted to
    /// [`DEFAULT_RESAMPLE_RATE`], otherwise the file's own rate is kept.
    ///
    /// # Errors
    /// `UnreadableFile` for a missing path, an unsupported format or an
    /// empty recording.
    pub fn from_file(path: impl AsRef<Path>, resample: bool) -> Result<Self> {
        let target = resample.then_some(DEFAULT_RESAMPLE_RATE);
        Self::from_file_with_rate(path, target)
    }

    /// Like [`Stimulus::from_file`], resampling to `config.resample_rate`
    pub fn from_file_configured(
        path: impl AsRef<Path>,
        resample: bool,
        config: &StimulusConfig,
    ) -> Result<Self> {
        Self::from_file_with_rate(path, resample.then_some(config.resample_rate))
    }

    /// Like [`Stimulus::from_file`] with an explicit target rate
    pub fn from_file_with_rate(path: impl AsRef<Path>, target_rate: Option<u32>) -> Result<Self> {
        let path = path.as_ref();
        let unreadable = |reason: String| PeripheryError::UnreadableFile {
            path: path.display().to_string(),
            reason,
        };

        let mut reader = WavReader::open(path).map_err(|e| unreadable(e.to_string()))?;
        let spec = reader.spec();
        let channels = spec.channels.max(1) as usize;

        let interleaved: Vec<f64> = match spec.sample_format {
            SampleFormat::Float => reader
                .samples::<f32>()
                .map(|s| s.map(f64::from))
                .collect::<std::result::Result<_, _>>()
                .map_err(|e| unreadable(e.to_string()))?,
            SampleFormat::Int => {
                let scale = 1.0 / (1u64 << (spec.bits_per_sample.saturating_sub(1))) as f64;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f64 * scale))
                    .collect::<std::result::Result<_, _>>()
                    .map_err(|e| unreadable(e.to_string()))?
            }
        };

        let mono: Vec<f64> = interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f64>() / channels as f64)
            .collect();
        if mono.is_empty() {
            return Err(unreadable("recording contains no samples".to_string()));
        }

        debug!(
            path = %path.display(),
            sample_rate = spec.sample_rate,
            channels,
            frames = mono.len(),
            "Decoded stimulus file"
        );

        let stimulus = match target_rate {
            Some(0) => Err(PeripheryError::invalid("target rate must be positive")),
            Some(rate) if rate != spec.sample_rate => {
                let ratio = rate as f64 / spec.sample_rate as f64;
                let out_len = (mono.len() as f64 * ratio).round().max(1.0) as usize;
                Stimulus::from_samples(resample(&mono, ratio, out_len), rate)
            }
            _ => Stimulus::from_samples(mono, spec.sample_rate),
        };
        stimulus.map_err(|e| match e {
            PeripheryError::InvalidParameter(reason) => unreadable(reason),
            other => other,
        })
    }
}
