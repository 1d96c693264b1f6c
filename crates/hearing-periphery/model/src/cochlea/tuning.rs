// Copyright 2025 Hearing Model Contributors
// SPDX-License-Identifier: Apache-2.0

//! Frequency-dependent tuning of the filter stage

use std::f64::consts::PI;

use hearing_config::Species;

use crate::error::{PeripheryError, Result};

/// Order of the control-path wideband gammatone
pub(crate) const WB_ORDER: i32 = 3;

/// Cochlear amplifier gain at `cf` (dB), limited to [15, 60]
pub fn cochlear_amplifier_gain(cf: f64) -> f64 {
    let gain = 52.0 / 2.0 * ((2.2 * (cf / 600.0).log10() + 0.15).tanh() + 1.0);
    gain.clamp(15.0, 60.0)
}

/// Q10 of the wideband filter for the species
pub fn q10(cf: f64, species: Species) -> f64 {
    match species {
        Species::Cat => 10f64.powf(0.4708 * (cf / 1e3).log10() + 0.4664),
        Species::HumanShera => (cf / 1000.0).powf(0.3) * 12.7 * 0.505 + 0.2085,
        Species::HumanGlasbergMoore => cf / 24.7 / (4.37 * (cf / 1000.0) + 1.0) * 0.505 + 0.2085,
    }
}

/// Distance from the apex (mm) via the species' Greenwood map
pub fn basilar_membrane_place(cf: f64, species: Species) -> f64 {
    match species {
        Species::Cat => 11.9 * (0.80 + cf / 456.0).log10(),
        _ => (35.0 / 2.1) * (1.0 + cf / 165.4).log10(),
    }
}

/// Control-path centre frequency: 1.2 mm basal to the CF place
pub fn control_center_frequency(cf: f64, species: Species) -> f64 {
    let place = basilar_membrane_place(cf, species);
    match species {
        Species::Cat => 456.0 * (10f64.powf((place + 1.2) / 11.9) - 0.80),
        _ => 165.4 * (10f64.powf((place + 1.2) / (35.0 / 2.1)) - 1.0),
    }
}

/// Total path delay to the IHC output (s), from the cat place map
pub fn cochlear_latency(cf: f64) -> f64 {
    let place = basilar_membrane_place(cf, Species::Cat);
    3.0 * (-place / 12.5).exp() * 1e-3
}

/// Time constants and gains of one cochlear channel
#[derive(Debug, Clone, PartialEq)]
pub struct CochlearTuning {
    pub cf: f64,
    pub species: Species,
    /// Control-path wideband centre frequency (Hz)
    pub center_frequency: f64,
    /// Wideband filter time constants (s)
    pub tau_max: f64,
    pub tau_min: f64,
    /// Signal-path (C1) time constant range (s)
    pub bm_tau_max: f64,
    pub bm_tau_min: f64,
    /// `bm_tau_min / bm_tau_max`
    pub ratio_bm: f64,
    /// Control-path time constant range (s)
    pub tau_wb_max: f64,
    pub tau_wb_min: f64,
}

impl CochlearTuning {
    /// # Errors
    /// `InvalidParameter` when `cf` is outside the species range
    pub fn new(cf: f64, species: Species) -> Result<Self> {
        let (lo, hi) = species.cf_range();
        if !(cf >= lo && cf <= hi) {
            return Err(PeripheryError::invalid(format!(
                "cf = {} is out of bounds [{}, {}]",
                cf, lo, hi
            )));
        }

        let gain = cochlear_amplifier_gain(cf);

        // Wideband filter
        let ratio = 10f64.powf(-gain / (20.0 * WB_ORDER as f64));
        let bandwidth = cf / q10(cf, species);
        let tau_max = 2.0 / (2.0 * PI * bandwidth);
        let tau_min = tau_max * ratio;

        // Signal path
        let bw_factor = 0.7;
        let factor = 2.5;
        let ratio_bm = 10f64.powf(-gain / (20.0 * factor));
        let bm_tau_max = tau_max / bw_factor;
        let bm_tau_min = bm_tau_max * ratio_bm;

        let tau_wb_max = tau_min + 0.2 * (tau_max - tau_min);
        let tau_wb_min = tau_wb_max / tau_max * tau_min;

        Ok(Self {
            cf,
            species,
            center_frequency: control_center_frequency(cf, species),
            tau_max,
            tau_min,
            bm_tau_max,
            bm_tau_min,
            ratio_bm,
            tau_wb_max,
            tau_wb_min,
        })
    }

    /// Resting C1 time constant for the given OHC health
    pub fn bm_tau_resting(&self, cohc: f64) -> f64 {
        cohc * (self.bm_tau_max - self.bm_tau_min) + self.bm_tau_min
    }

    /// Control-path time constant tracking the C1 time constant
    pub fn tau_wb_for(&self, tau_c1: f64) -> f64 {
        self.tau_wb_max
            + (tau_c1 - self.bm_tau_max) * (self.tau_wb_max - self.tau_wb_min)
                / (self.bm_tau_max - self.bm_tau_min)
    }
}
