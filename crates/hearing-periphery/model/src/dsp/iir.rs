// Copyright 2025 Hearing Model Contributors
// SPDX-License-Identifier: Apache-2.0

//! Recursive filter sections

use std::f64::consts::PI;

/// Direct-form I second-order section, zero initial state
///
/// `y[n] = b0 x[n] + b1 x[n-1] + b2 x[n-2] - a1 y[n-1] - a2 y[n-2]`
/// after normalising by `a0`.
#[derive(Debug, Clone)]
pub struct Biquad {
    b: [f64; 3],
    a1: f64,
    a2: f64,
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
}

impl Biquad {
    /// Build from numerator `b` and denominator `a` (any `a[0] != 0`)
    pub fn new(b: [f64; 3], a: [f64; 3]) -> Self {
        let a0 = a[0];
        Self {
            b: [b[0] / a0, b[1] / a0, b[2] / a0],
            a1: a[1] / a0,
            a2: a[2] / a0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Build from feedback taps `y[n] = c1 y[n-1] + c2 y[n-2] + b . x`
    pub fn from_feedback(b: [f64; 3], c1: f64, c2: f64) -> Self {
        Self::new(b, [1.0, -c1, -c2])
    }

    #[inline]
    pub fn process(&mut self, x: f64) -> f64 {
        let y = self.b[0] * x + self.b[1] * self.x1 + self.b[2] * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = y;
        y
    }
}

/// Cascade of identical bilinear one-pole low-pass stages
///
/// Used after the OHC nonlinearity (600 Hz, 2nd order) and for the IHC
/// membrane (3 kHz, 7th order).
#[derive(Debug, Clone)]
pub struct LowPassCascade {
    c1: f64,
    c2: f64,
    gain: f64,
    current: Vec<f64>,
    previous: Vec<f64>,
}

impl LowPassCascade {
    pub fn new(cutoff_hz: f64, tdres: f64, order: usize, gain: f64) -> Self {
        let c = 2.0 / tdres;
        let w = 2.0 * PI * cutoff_hz;
        Self {
            c1: (c - w) / (c + w),
            c2: w / (w + c),
            gain,
            current: vec![0.0; order + 1],
            previous: vec![0.0; order + 1],
        }
    }

    #[inline]
    pub fn process(&mut self, x: f64) -> f64 {
        let order = self.current.len() - 1;
        self.current[0] = x * self.gain;
        for i in 0..order {
            self.current[i + 1] =
                self.c1 * self.previous[i + 1] + self.c2 * (self.current[i] + self.previous[i]);
        }
        self.previous.copy_from_slice(&self.current);
        self.current[order]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_biquad_impulse_of_fir() {
        let mut f = Biquad::new([1.0, 2.0, 3.0], [1.0, 0.0, 0.0]);
        let out: Vec<f64> = [1.0, 0.0, 0.0, 0.0].iter().map(|&x| f.process(x)).collect();
        assert_eq!(out, vec![1.0, 2.0, 3.0, 0.0]);
    }

    #[test]
    fn test_biquad_normalises_a0() {
        let mut f = Biquad::new([2.0, 0.0, 0.0], [2.0, -1.0, 0.0]);
        // y = x + 0.5 y[n-1]
        assert_eq!(f.process(1.0), 1.0);
        assert_eq!(f.process(0.0), 0.5);
        assert_eq!(f.process(0.0), 0.25);
    }

    #[test]
    fn test_lowpass_dc_gain() {
        let mut lp = LowPassCascade::new(3000.0, 1e-5, 7, 1.0);
        let mut y = 0.0;
        for _ in 0..20_000 {
            y = lp.process(1.0);
        }
        assert!((y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_lowpass_attenuates_high_frequency() {
        let tdres = 1e-5;
        let mut lp = LowPassCascade::new(600.0, tdres, 2, 1.0);
        let mut peak: f64 = 0.0;
        for n in 0..20_000 {
            let x = (2.0 * PI * 10e3 * n as f64 * tdres).sin();
            let y = lp.process(x);
            if n > 10_000 {
                peak = peak.max(y.abs());
            }
        }
        assert!(peak < 0.01, "peak {peak}");
    }
}
