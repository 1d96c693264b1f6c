// Copyright 2025 Hearing Model Contributors
// SPDX-License-Identifier: Apache-2.0

//! Tenth-order chirping pole/zero filter of the signal (C1) and wideband
//! (C2) paths
//!
//! Five bilinear sections, each a complex pole pair and one real zero. The
//! zero is re-placed every sample so that the phase at CF stays where the
//! resting filter put it, which produces the glide ("chirp") of the
//! impulse response as the poles move.

use std::f64::consts::TAU;

use crate::error::{PeripheryError, Result};

const HALF_ORDER: usize = 5;

#[derive(Debug, Clone)]
pub struct ChirpFilter {
    stage: &'static str,
    fs_bilinear: f64,
    omega: f64,
    sigma0: f64,
    ipw: f64,
    ipb: f64,
    rpa: f64,
    init_phase: f64,
    norm_gain: f64,
    output_scale: f64,
    /// `[x[n], x[n-1], x[n-2]]` of each section; the last entry is the output
    inputs: [[f64; 3]; HALF_ORDER + 1],
    /// `[y[n-1], y[n-2]]` of each section
    outputs: [[f64; 2]; HALF_ORDER],
}

impl ChirpFilter {
    /// C1 filter, output divided by 4 to give the correct path gain
    pub fn signal_path(cf: f64, tdres: f64, tau_max: f64) -> Self {
        Self::new("C1 chirp filter", cf, tdres, tau_max, 0.25)
    }

    /// C2 filter
    pub fn wideband_path(cf: f64, tdres: f64, tau_max: f64) -> Self {
        Self::new("C2 chirp filter", cf, tdres, tau_max, 1.0)
    }

    fn new(stage: &'static str, cf: f64, tdres: f64, tau_max: f64, output_scale: f64) -> Self {
        let sigma0 = 1.0 / tau_max;
        let ipw = 1.01 * cf * TAU - 50.0;
        let ipb = 0.2343 * TAU * cf - 1104.0;
        let rpa = 10f64.powf(cf.log10() * 0.9 + 0.55) + 2000.0;
        let pzero = 10f64.powf(cf.log10() * 0.7 + 1.6) + 500.0;
        let omega = TAU * cf;

        let mut filter = Self {
            stage,
            fs_bilinear: TAU * cf / (TAU * cf * tdres / 2.0).tan(),
            omega,
            sigma0,
            ipw,
            ipb,
            rpa,
            init_phase: 0.0,
            norm_gain: 1.0,
            output_scale,
            inputs: [[0.0; 3]; HALF_ORDER + 1],
            outputs: [[0.0; 2]; HALF_ORDER],
        };

        let poles = filter.section_poles(-sigma0);
        filter.init_phase = HALF_ORDER as f64 * (omega / pzero).atan() + filter.pole_phase(&poles);

        // Unity gain at CF for the resting poles, each pole and its conjugate
        let gain_sq: f64 = poles
            .iter()
            .map(|&(re, im)| ((omega - im).powi(2) + re * re) * ((omega + im).powi(2) + re * re))
            .product();
        filter.norm_gain =
            gain_sq.sqrt() / (omega * omega + pzero * pzero).sqrt().powi(HALF_ORDER as i32);
        filter
    }

    pub fn sigma0(&self) -> f64 {
        self.sigma0
    }

    /// Upper-half-plane pole of each section for a given first-pole real part
    fn section_poles(&self, p1_re: f64) -> [(f64, f64); HALF_ORDER] {
        let p1 = (p1_re, self.ipw);
        let p5 = (p1_re - self.rpa, self.ipw - self.ipb);
        let p3 = ((p1.0 + p5.0) * 0.5, (p1.1 + p5.1) * 0.5);
        [p1, p3, p5, p1, p5]
    }

    fn pole_phase(&self, poles: &[(f64, f64); HALF_ORDER]) -> f64 {
        poles
            .iter()
            .map(|&(re, im)| -((self.omega - im) / -re).atan() - ((self.omega + im) / -re).atan())
            .sum()
    }

    /// Filter one sample with the first pole's real part at `p1_re`
    ///
    /// # Errors
    /// `NumericalInstability` when a pole or the zero leaves the left half-plane
    #[inline]
    pub fn process(&mut self, x: f64, p1_re: f64) -> Result<f64> {
        if p1_re > 0.0 {
            return Err(PeripheryError::unstable(
                self.stage,
                format!("pole in the right half-plane (real part {p1_re})"),
            ));
        }
        let poles = self.section_poles(p1_re);
        let phase = self.pole_phase(&poles);
        let rzero = -self.omega / ((self.init_phase - phase) / HALF_ORDER as f64).tan();
        if rzero > 0.0 {
            return Err(PeripheryError::unstable(
                self.stage,
                format!("zero in the right half-plane ({rzero})"),
            ));
        }

        let fs = self.fs_bilinear;
        self.inputs[0] = [x, self.inputs[0][0], self.inputs[0][1]];
        for (i, &(re, im)) in poles.iter().enumerate() {
            let [x0, x1, x2] = self.inputs[i];
            let [y1, y2] = self.outputs[i];
            let temp = (fs - re).powi(2) + im * im;
            let dy = (x0 * (fs - rzero) - 2.0 * rzero * x1 - (fs + rzero) * x2
                + 2.0 * y1 * (fs * fs - re * re - im * im)
                - y2 * ((fs + re).powi(2) + im * im))
                / temp;
            self.inputs[i + 1] = [dy, y1, y2];
            self.outputs[i] = [dy, y1];
        }
        Ok(self.outputs[HALF_ORDER - 1][0] * self.norm_gain * self.output_scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cochlea::CochlearTuning;
    use hearing_config::Species;

    fn steady_peak(filter: &mut ChirpFilter, cf: f64, tdres: f64, p1_re: f64) -> f64 {
        let n = 10_000;
        let mut peak: f64 = 0.0;
        for i in 0..n {
            let y = filter
                .process((TAU * cf * i as f64 * tdres).sin(), p1_re)
                .unwrap();
            if i > n / 2 {
                peak = peak.max(y.abs());
            }
        }
        peak
    }

    #[test]
    fn test_resting_gain_at_cf() {
        let (cf, tdres) = (2000.0, 1e-5);
        let tuning = CochlearTuning::new(cf, Species::Cat).unwrap();
        let mut c1 = ChirpFilter::signal_path(cf, tdres, tuning.bm_tau_max);
        let sigma0 = c1.sigma0();
        let peak = steady_peak(&mut c1, cf, tdres, -sigma0);
        assert!((peak - 0.25).abs() < 0.01, "{peak}");
    }

    #[test]
    fn test_broader_poles_reduce_gain() {
        let (cf, tdres) = (2000.0, 1e-5);
        let tuning = CochlearTuning::new(cf, Species::Cat).unwrap();
        let mut rest = ChirpFilter::wideband_path(cf, tdres, tuning.bm_tau_max);
        let mut wide = rest.clone();
        let sigma0 = rest.sigma0();
        let a = steady_peak(&mut rest, cf, tdres, -sigma0);
        let b = steady_peak(&mut wide, cf, tdres, -sigma0 / tuning.ratio_bm);
        assert!(b < a);
    }

    #[test]
    fn test_unstable_pole_is_reported() {
        let mut c1 = ChirpFilter::signal_path(2000.0, 1e-5, 1e-3);
        let err = c1.process(1.0, 10.0).unwrap_err();
        assert!(matches!(err, PeripheryError::NumericalInstability { .. }));
    }
}
