// Copyright 2025 Hearing Model Contributors
// SPDX-License-Identifier: Apache-2.0

//! Control path: wideband gammatone, OHC nonlinearity and the mapping to
//! the signal-path time constant

use std::f64::consts::TAU;

use rustfft::num_complex::Complex64;

/// Frequency-shifted complex one-pole cascade with a time-varying time
/// constant
#[derive(Debug, Clone)]
pub struct WidebandGammatone {
    phase_step: f64,
    tdres: f64,
    phase: f64,
    current: Vec<Complex64>,
    previous: Vec<Complex64>,
}

impl WidebandGammatone {
    pub fn new(center_frequency: f64, tdres: f64, order: usize) -> Self {
        Self {
            phase_step: -TAU * center_frequency * tdres,
            tdres,
            phase: 0.0,
            current: vec![Complex64::new(0.0, 0.0); order + 1],
            previous: vec![Complex64::new(0.0, 0.0); order + 1],
        }
    }

    #[inline]
    pub fn process(&mut self, x: f64, tau: f64, gain: f64) -> f64 {
        self.phase = (self.phase + self.phase_step) % TAU;

        let dtmp = tau * 2.0 / self.tdres;
        let c1 = (dtmp - 1.0) / (dtmp + 1.0);
        let c2 = 1.0 / (dtmp + 1.0);

        let order = self.current.len() - 1;
        let shift = Complex64::from_polar(1.0, self.phase);
        self.current[0] = shift * x;
        for j in 1..=order {
            self.current[j] =
                (self.current[j - 1] + self.previous[j - 1]) * (c2 * gain) + self.previous[j] * c1;
        }
        let out = (shift.conj() * self.current[order]).re;
        self.previous.copy_from_slice(&self.current);
        out
    }
}

/// Gain that normalises the gammatone at `cf`, and its group delay in samples
pub fn gain_group_delay(tdres: f64, center_frequency: f64, cf: f64, tau: f64) -> (f64, usize) {
    let tmpcos = (TAU * (center_frequency - cf) * tdres).cos();
    let dtmp2 = tau * 2.0 / tdres;
    let c1 = (dtmp2 - 1.0) / (dtmp2 + 1.0);
    let c2 = 1.0 / (dtmp2 + 1.0);
    let tmp1 = 1.0 + c1 * c1 - 2.0 * c1 * tmpcos;
    let tmp2 = 2.0 * c2 * c2 * (1.0 + tmpcos);
    let gain = (tmp1 / tmp2).sqrt();
    let delay = (0.5 - (c1 * c1 - c1 * tmpcos) / tmp1).floor();
    (gain, delay.max(0.0) as usize)
}

/// Asymmetric second-order Boltzmann function of the OHC transducer
pub fn boltzmann(x: f64, asym: f64, s0: f64, s1: f64, x1: f64) -> f64 {
    let shift = 1.0 / (1.0 + asym);
    let x0 = s0 * ((1.0 / shift - 1.0) / (1.0 + (x1 / s1).exp())).ln();
    let out = 1.0 / (1.0 + (-(x - x0) / s0).exp() * (1.0 + (-(x - x1) / s1).exp())) - shift;
    out / (1.0 - shift)
}

/// Map the low-passed OHC output to a time constant in `[tau_min, tau_max]`
pub fn nl_after_ohc(x: f64, tau_min: f64, tau_max: f64, asym: f64) -> f64 {
    let ratio = tau_min / tau_max;
    let min_r = if ratio < 0.05 { 0.5 * ratio } else { 0.05 };
    let dc = (asym - 1.0) / (asym + 1.0) / 2.0 - min_r;
    let r1 = ratio - min_r;
    let s0 = -dc / (r1 / (1.0 - min_r)).ln();
    let out = tau_max * (min_r + (1.0 - min_r) * (-x.abs() / s0).exp());
    out.clamp(tau_min, tau_max)
}
