// Copyright 2025 Hearing Model Contributors
// SPDX-License-Identifier: Apache-2.0

//! # Signal-processing primitives
//!
//! Small building blocks shared by the stimulus, cochlea and synapse stages:
//! - [`iir`]: second-order sections and one-pole low-pass cascades
//! - [`resample`]: band-limited (windowed-sinc) rate conversion
//! - window, spacing and interpolation helpers in this module

pub mod iir;
pub mod resample;

pub use iir::{Biquad, LowPassCascade};
pub use resample::resample;

use std::f64::consts::PI;

/// Symmetric Hamming window of `n` coefficients
pub fn hamming(n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![1.0],
        _ => {
            let denom = (n - 1) as f64;
            (0..n)
                .map(|i| 0.54 - 0.46 * (2.0 * PI * i as f64 / denom).cos())
                .collect()
        }
    }
}

/// `n` points spaced evenly on a log scale from `start` to `end` (inclusive)
///
/// A single point yields `[start]`.
pub fn log_space(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let (lo, hi) = (start.log10(), end.log10());
            let step = (hi - lo) / (n - 1) as f64;
            (0..n).map(|i| 10f64.powf(lo + step * i as f64)).collect()
        }
    }
}

/// Linear up-sampling by an integer factor, truncated or zero-padded to `out_len`
///
/// Each input interval `[x[z], x[z + 1])` is filled with `factor` evenly
/// spaced points; the tail past the last interval stays zero.
pub fn upsample_linear(x: &[f64], factor: usize, out_len: usize) -> Vec<f64> {
    let mut out = vec![0.0; out_len];
    if factor == 0 {
        return out;
    }
    for (z, pair) in x.windows(2).enumerate() {
        let incr = (pair[1] - pair[0]) / factor as f64;
        for b in 0..factor {
            let idx = z * factor + b;
            if idx >= out_len {
                return out;
            }
            out[idx] = pair[0] + b as f64 * incr;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hamming_shape() {
        let w = hamming(5);
        assert_eq!(w.len(), 5);
        assert!((w[0] - 0.08).abs() < 1e-12);
        assert!((w[2] - 1.0).abs() < 1e-12);
        assert!((w[1] - w[3]).abs() < 1e-12);
        assert_eq!(hamming(1), vec![1.0]);
    }

    #[test]
    fn test_log_space_endpoints() {
        let cfs = log_space(250.0, 16e3, 4);
        assert_eq!(cfs.len(), 4);
        assert!((cfs[0] - 250.0).abs() < 1e-9);
        assert!((cfs[3] - 16e3).abs() < 1e-6);
        assert!((cfs[1] / cfs[0] - cfs[2] / cfs[1]).abs() < 1e-9);
        assert_eq!(log_space(300.0, 1e3, 1), vec![300.0]);
    }

    #[test]
    fn test_upsample_linear() {
        let y = upsample_linear(&[0.0, 1.0, 3.0], 2, 5);
        assert_eq!(y, vec![0.0, 0.5, 1.0, 2.0, 0.0]);
    }
}
