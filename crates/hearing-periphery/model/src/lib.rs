// Copyright 2025 Hearing Model Contributors
// SPDX-License-Identifier: Apache-2.0

//! # hearing-periphery-model
//!
//! Phenomenological model of the mammalian auditory periphery, from sound
//! pressure to auditory-nerve spikes:
//!
//! ```text
//! Stimulus ─▶ middle ear ─▶ basilar-membrane filter (C1/C2) ─▶ inner hair cell
//!          ─▶ IHC/AN synapse (power-law adaptation, vesicle pool) ─▶ spike generator
//! ```
//!
//! Everything up to the synapse is deterministic; spike generation draws
//! from a per-(channel, repetition) random stream (see [`seed`]).
//!
//! ## Example
//!
//! ```rust,no_run
//! use hearing_config::PeripheryConfig;
//! use hearing_periphery_model::{PeripheryModel, Stimulus};
//!
//! let stimulus = Stimulus::ramped_sine_wave(0.25, 0.3, 100_000, 2.5e-3, 25e-3, 5000.0, 60.0)?;
//! let model = PeripheryModel::from_config(&PeripheryConfig::default())?;
//! let prepared = model.prepare(&stimulus)?;
//! let response = model.channel_response(&prepared, 5000.0, 0)?;
//! let spikes = model.spike_train(&response, 0, 0);
//! println!("{} spikes", spikes.len());
//! # Ok::<(), hearing_periphery_model::PeripheryError>(())
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod channel;
pub mod cochlea;
pub mod dsp;
pub mod error;
pub mod pipeline;
pub mod seed;
pub mod spikes;
pub mod stimulus;
pub mod synapse;

pub use channel::{characteristic_frequencies, BARK_SCALE_HZ};
pub use cochlea::{check_sampling_rate, BasilarMembraneResponse, PeripheralFilter};
pub use error::{PeripheryError, Result};
pub use pipeline::{PeripheryModel, PreparedStimulus};
pub use spikes::{spike_generator, ReleaseSites, Renewal, SpikeGenerator, SpikeTrain};
pub use stimulus::Stimulus;
pub use synapse::{DischargeEstimate, Synapse, SynapseOutput};
