// Copyright 2025 Hearing Model Contributors
// SPDX-License-Identifier: Apache-2.0

//! Per-channel nonlinear basilar-membrane filter

use hearing_config::CochleaConfig;
use tracing::trace;

use super::chirp::ChirpFilter;
use super::control::{boltzmann, gain_group_delay, nl_after_ohc, WidebandGammatone};
use super::tuning::{CochlearTuning, WB_ORDER};
use crate::dsp::LowPassCascade;
use crate::error::{ensure_finite, PeripheryError, Result};

/// C1 (signal path) and C2 (wideband path) outputs of one channel
#[derive(Debug, Clone, PartialEq)]
pub struct BasilarMembraneResponse {
    pub c1: Vec<f64>,
    pub c2: Vec<f64>,
}

impl BasilarMembraneResponse {
    pub fn len(&self) -> usize {
        self.c1.len()
    }

    pub fn is_empty(&self) -> bool {
        self.c1.is_empty()
    }
}

/// Filter stage of one channel
///
/// Holds only parameters; [`PeripheralFilter::run`] allocates fresh state,
/// so one instance may be shared across threads.
#[derive(Debug, Clone)]
pub struct PeripheralFilter {
    tuning: CochlearTuning,
    tdres: f64,
    cohc: f64,
}

impl PeripheralFilter {
    /// # Errors
    /// `InvalidParameter` for a CF outside the species range, OHC health
    /// outside [0, 1] or a non-positive time resolution
    pub fn new(cf: f64, tdres: f64, config: &CochleaConfig) -> Result<Self> {
        if !(0.0..=1.0).contains(&config.cohc) {
            return Err(PeripheryError::invalid(format!(
                "cohc = {} is out of bounds [0, 1]",
                config.cohc
            )));
        }
        if !(tdres > 0.0 && tdres.is_finite()) {
            return Err(PeripheryError::invalid(format!(
                "time resolution must be positive, got {}",
                tdres
            )));
        }
        Ok(Self {
            tuning: CochlearTuning::new(cf, config.species)?,
            tdres,
            cohc: config.cohc,
        })
    }

    /// Run the control, C1 and C2 paths over the middle-ear output
    ///
    /// # Errors
    /// `NumericalInstability` if a pole or zero becomes unstable or an
    /// output is not finite
    pub fn run(&self, middle_ear: &[f64]) -> Result<BasilarMembraneResponse> {
        let t = &self.tuning;
        let tdres = self.tdres;
        let n = middle_ear.len();

        let mut tau_wb = t.tau_wb_for(t.bm_tau_resting(self.cohc));
        let (mut wb_gain, group_delay) = gain_group_delay(tdres, t.center_frequency, t.cf, tau_wb);

        // Gains are applied after the group delay of the wideband filter
        let mut scheduled = vec![0.0; n];
        if group_delay < n {
            scheduled[group_delay] = wb_gain;
        }
        let mut last_gain = wb_gain;

        let mut gammatone = WidebandGammatone::new(t.center_frequency, tdres, WB_ORDER as usize);
        let mut ohc_lowpass = LowPassCascade::new(600.0, tdres, 2, 1.0);
        let mut c1_filter = ChirpFilter::signal_path(t.cf, tdres, t.bm_tau_max);
        let mut c2_filter = ChirpFilter::wideband_path(t.cf, tdres, t.bm_tau_max);
        let sigma0 = c1_filter.sigma0();
        let c2_pole = -c2_filter.sigma0() / t.ratio_bm;

        let wb_scale = 10e3 * (t.cf / 5e3).max(1.0);

        let mut c1 = Vec::with_capacity(n);
        let mut c2 = Vec::with_capacity(n);

        for (i, &x) in middle_ear.iter().enumerate() {
            let wb_out = (tau_wb / t.tau_wb_max).powi(WB_ORDER)
                * gammatone.process(x, tau_wb, wb_gain)
                * wb_scale;

            let ohc = ohc_lowpass.process(boltzmann(wb_out, 7.0, 12.0, 5.0, 5.0));
            let tau_nl = nl_after_ohc(ohc, t.bm_tau_min, t.bm_tau_max, 7.0);
            let tau_c1 = self.cohc * (tau_nl - t.bm_tau_min) + t.bm_tau_min;
            if 1.0 / tau_c1 < 0.0 {
                return Err(PeripheryError::unstable(
                    "control path",
                    format!("negative time constant {tau_c1} at sample {i}"),
                ));
            }
            let rsigma = 1.0 / tau_c1 - 1.0 / t.bm_tau_max;

            tau_wb = t.tau_wb_for(tau_c1);
            let (gain, _) = gain_group_delay(tdres, t.center_frequency, t.cf, tau_wb);
            if group_delay + i < n {
                scheduled[group_delay + i] = gain;
            }
            if scheduled[i] == 0.0 {
                scheduled[i] = last_gain;
            }
            wb_gain = scheduled[i];
            last_gain = wb_gain;

            c1.push(c1_filter.process(x, -sigma0 - rsigma)?);
            c2.push(c2_filter.process(x, c2_pole)?);
        }

        ensure_finite("C1 chirp filter", &c1)?;
        ensure_finite("C2 chirp filter", &c2)?;
        trace!(cf = t.cf, samples = n, group_delay, "basilar membrane filtered");

        Ok(BasilarMembraneResponse { c1, c2 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearing_config::Species;
    use std::f64::consts::TAU;

    fn tone(level_pa: f64, freq: f64, n: usize, tdres: f64) -> Vec<f64> {
        (0..n)
            .map(|i| level_pa * (TAU * freq * i as f64 * tdres).sin())
            .collect()
    }

    fn rms(x: &[f64]) -> f64 {
        (x.iter().map(|v| v * v).sum::<f64>() / x.len() as f64).sqrt()
    }

    #[test]
    fn test_output_length_and_causality() {
        let tdres = 1e-5;
        let filter = PeripheralFilter::new(1e3, tdres, &CochleaConfig::default()).unwrap();
        let mut x = vec![0.0; 200];
        x.extend(tone(0.02, 1e3, 800, tdres));
        let bm = filter.run(&x).unwrap();
        assert_eq!(bm.len(), x.len());
        assert_eq!(bm.c2.len(), x.len());
        assert!(bm.c1[..200].iter().all(|&v| v == 0.0));
        assert!(bm.c2[..200].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_compressive_growth() {
        let tdres = 1e-5;
        let cf = 4e3;
        let filter = PeripheralFilter::new(cf, tdres, &CochleaConfig::default()).unwrap();
        let soft = filter.run(&tone(2e-4, cf, 5000, tdres)).unwrap();
        let loud = filter.run(&tone(2e-1, cf, 5000, tdres)).unwrap();
        let ratio = rms(&loud.c1[2500..]) / rms(&soft.c1[2500..]);
        // 60 dB more input, well under 1000x more output
        assert!(ratio > 1.0 && ratio < 500.0, "{ratio}");
    }

    #[test]
    fn test_rejects_bad_parameters() {
        let mut config = CochleaConfig::default();
        config.cohc = 1.5;
        assert!(PeripheralFilter::new(1e3, 1e-5, &config).is_err());
        config.cohc = 1.0;
        config.species = Species::HumanShera;
        assert!(PeripheralFilter::new(25e3, 1e-5, &config).is_err());
        assert!(PeripheralFilter::new(1e3, 0.0, &CochleaConfig::default()).is_err());
    }

    #[test]
    fn test_reusable_across_runs() {
        let tdres = 1e-5;
        let filter = PeripheralFilter::new(2e3, tdres, &CochleaConfig::default()).unwrap();
        let x = tone(0.02, 2e3, 1000, tdres);
        assert_eq!(filter.run(&x).unwrap(), filter.run(&x).unwrap());
    }
}
