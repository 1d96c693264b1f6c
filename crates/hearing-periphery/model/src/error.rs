// Copyright 2025 Hearing Model Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types for the periphery model and neurogram engine

use thiserror::Error;

/// Errors raised while building stimuli or running the periphery pipeline
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PeripheryError {
    /// Malformed stimulus or model request (bad ramp, frequency, level, channel count...)
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unreadable stimulus file {path}: {reason}")]
    UnreadableFile { path: String, reason: String },

    /// Bin width is not a positive multiple of the sampling period
    #[error("Invalid bin width: {0}")]
    InvalidBinWidth(String),

    #[error("Neurogram has no output yet; call create() first")]
    NotPopulated,

    /// Non-finite values or an unstable filter inside the model cascade
    #[error("Numerical instability in {stage}: {detail}")]
    NumericalInstability { stage: &'static str, detail: String },

    #[error("Unsupported sampling rate {0} Hz: must be a multiple of 10 kHz between 100 kHz and 500 kHz")]
    UnsupportedSamplingRate(u32),

    #[error("Worker pool error: {0}")]
    WorkerPool(String),
}

pub type Result<T> = std::result::Result<T, PeripheryError>;

impl PeripheryError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        PeripheryError::InvalidParameter(msg.into())
    }

    pub(crate) fn unstable(stage: &'static str, detail: impl Into<String>) -> Self {
        PeripheryError::NumericalInstability {
            stage,
            detail: detail.into(),
        }
    }
}

/// Fail with `NumericalInstability` if any sample is NaN or infinite
pub(crate) fn ensure_finite(stage: &'static str, samples: &[f64]) -> Result<()> {
    match samples.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(PeripheryError::unstable(
            stage,
            format!("non-finite value {} at sample {}", samples[index], index),
        )),
        None => Ok(()),
    }
}
