// Copyright 2025 Hearing Model Contributors
// SPDX-License-Identifier: Apache-2.0

//! # Cochlea
//!
//! Middle ear, nonlinear basilar-membrane filter stage and inner hair cell.
//!
//! ```text
//! stimulus (Pa) ─▶ middle ear ─┬─▶ control path (wideband gammatone ─▶ OHC) ─┐
//!                              │                                              ▼ tau_c1
//!                              ├─▶ C1 chirp filter (signal path) ──────────────▶ c1 ─┐
//!                              └─▶ C2 chirp filter (wideband path) ────────────▶ c2 ─┴─▶ IHC
//! ```
//!
//! The middle ear runs once per stimulus; everything downstream runs once
//! per channel in a single causal pass.

mod chirp;
mod control;
mod filter;
mod ihc;
mod middle_ear;
mod tuning;

pub use chirp::ChirpFilter;
pub use control::{boltzmann, gain_group_delay, nl_after_ohc, WidebandGammatone};
pub use filter::{BasilarMembraneResponse, PeripheralFilter};
pub use ihc::{inner_hair_cell, nl_logarithm};
pub use middle_ear::{middle_ear, MiddleEar};
pub use tuning::{
    basilar_membrane_place, cochlear_amplifier_gain, cochlear_latency, control_center_frequency,
    q10, CochlearTuning,
};

use crate::error::{PeripheryError, Result};

/// Lowest and highest supported sampling rates (Hz)
pub const MIN_SAMPLING_RATE: u32 = 100_000;
pub const MAX_SAMPLING_RATE: u32 = 500_000;

/// The model is defined for multiples of 10 kHz between 100 and 500 kHz
pub fn check_sampling_rate(sampling_rate: u32) -> Result<()> {
    if sampling_rate % 10_000 == 0
        && (MIN_SAMPLING_RATE..=MAX_SAMPLING_RATE).contains(&sampling_rate)
    {
        Ok(())
    } else {
        Err(PeripheryError::UnsupportedSamplingRate(sampling_rate))
    }
}
