// Copyright 2025 Hearing Model Contributors
// SPDX-License-Identifier: Apache-2.0

//! # hearing-periphery-neurogram
//!
//! Builds neurograms: for every channel the periphery model is run once
//! (filter, hair cell, synapse) and then sampled `repetitions` times by the
//! spike generator. Spike trains are binned into per-worker count rows and
//! merged by element-wise addition, so the result does not depend on
//! scheduling order or thread count.
//!
//! ```rust,no_run
//! use hearing_periphery_model::Stimulus;
//! use hearing_periphery_neurogram::Neurogram;
//!
//! let stimulus = Stimulus::ramped_sine_wave(0.25, 0.3, 100_000, 2.5e-3, 25e-3, 5000.0, 60.0)?;
//! let mut neurogram = Neurogram::new(2)?;
//! neurogram.set_bin_width(stimulus.time_resolution());
//! neurogram.create(&stimulus, 1)?;
//! assert_eq!(neurogram.get_output()?.dim(), (2, stimulus.n_simulation_timesteps()));
//! # Ok::<(), hearing_periphery_model::PeripheryError>(())
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod binning;
mod neurogram;
mod pool;

pub use binning::BinLayout;
pub use neurogram::Neurogram;
