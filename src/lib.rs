// Copyright 2025 Hearing Model Contributors
// SPDX-License-Identifier: Apache-2.0

//! # hearing-model
//!
//! Simulation of the mammalian auditory periphery: middle ear, nonlinear
//! cochlear filtering, inner hair cell, IHC/AN synapse and auditory-nerve
//! spike generation, aggregated into neurograms (channel × time-bin spike
//! counts).
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! hearing-model = "0.3"
//! ```
//!
//! ```rust,no_run
//! use hearing_model::prelude::*;
//!
//! let stimulus = Stimulus::ramped_sine_wave(
//!     0.25,     // tone duration (s)
//!     0.3,      // simulation window (s)
//!     100_000,  // sampling rate (Hz)
//!     2.5e-3,   // rise/fall ramp (s)
//!     25e-3,    // leading silence (s)
//!     5000.0,   // frequency (Hz)
//!     60.0,     // level (dB SPL)
//! )?;
//!
//! let mut neurogram = Neurogram::new(2)?;
//! neurogram.set_bin_width(stimulus.time_resolution());
//! neurogram.create(&stimulus, 1)?;
//! let counts = neurogram.get_output()?;
//! assert_eq!(counts.dim(), (2, stimulus.n_simulation_timesteps()));
//! # Ok::<(), PeripheryError>(())
//! ```
//!
//! ## Feature Flags
//!
//! - **`file-logging`** (default): JSON log files per run via
//!   `hearing-observability`
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: hearing-config, hearing-observability      │
//! │  (TOML configuration, tracing setup)                    │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Model: hearing-periphery-model                         │
//! │  (stimulus, filter stage, hair cell, synapse, spikes)   │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Engine: hearing-periphery-neurogram                    │
//! │  (parallel fan-out over channels and repetitions)       │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## License
//!
//! Apache-2.0

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use hearing_config as config;
pub use hearing_observability as observability;
pub use hearing_periphery_model as model;
pub use hearing_periphery_neurogram as neurogram;

pub use hearing_periphery_model::BARK_SCALE_HZ;

/// Matrix type returned by neurogram accessors
pub use ndarray;

/// Prelude - commonly used types and traits
pub mod prelude {
    pub use crate::config::{
        load_config, validate_config, CfSpacing, NoiseMode, PeripheryConfig,
        PowerLawImplementation, Species, SpikeModel,
    };
    pub use crate::model::{
        characteristic_frequencies, PeripheryError, PeripheryModel, Result, SpikeGenerator,
        SpikeTrain, Stimulus, SynapseOutput,
    };
    pub use crate::neurogram::Neurogram;
    pub use crate::observability::{init_logging, CrateDebugFlags, LoggingConfig};
    pub use ndarray::Array2;
}
