// Copyright 2025 Hearing Model Contributors
// SPDX-License-Identifier: Apache-2.0

//! Fractional Gaussian noise for the fast adaptation branch
//!
//! Exact spectral synthesis (circulant embedding) at Hurst index 0.9,
//! generated at 10 Hz and up-sampled by 1000 to the synapse rate.

use rand::Rng;
use rand_distr::StandardNormal;
use rustfft::num_complex::Complex64;
use rustfft::FftPlanner;

use crate::dsp::resample;
use crate::error::{PeripheryError, Result};

const HURST: f64 = 0.9;
const UPSAMPLE: usize = 1000;

/// Standard deviation of the noise for a spontaneous rate
pub fn noise_sigma(spont: f64) -> f64 {
    if spont < 0.2 {
        1.0
    } else if spont < 20.0 {
        10.0
    } else {
        spont / 2.0
    }
}

/// Square root of the circulant eigenvalues of the fGn autocovariance
fn spectral_magnitude(n_samples: usize) -> Result<Vec<f64>> {
    let n_fft = (2 * (n_samples - 1)).next_power_of_two();
    let half = n_fft / 2;

    let autocovariance = |k: f64| {
        0.5 * ((k + 1.0).powf(2.0 * HURST) - 2.0 * k.powf(2.0 * HURST)
            + (k - 1.0).abs().powf(2.0 * HURST))
    };
    let mut spectrum: Vec<Complex64> = (0..half)
        .chain((1..=half).rev())
        .map(|k| Complex64::new(autocovariance(k as f64), 0.0))
        .collect();

    FftPlanner::new()
        .plan_fft_forward(n_fft)
        .process(&mut spectrum);

    let peak = spectrum.iter().fold(0.0f64, |m, z| m.max(z.re.abs()));
    spectrum
        .iter()
        .map(|z| {
            if z.re < -1e-9 * peak {
                Err(PeripheryError::unstable(
                    "fractional Gaussian noise",
                    format!("negative circulant eigenvalue {}", z.re),
                ))
            } else {
                Ok(z.re.max(0.0).sqrt())
            }
        })
        .collect()
}

/// `n_out` samples of fractional Gaussian noise scaled by [`noise_sigma`]
///
/// # Errors
/// `NumericalInstability` if the circulant embedding is not positive
pub fn fractional_gaussian_noise<R: Rng + ?Sized>(
    n_out: usize,
    spont: f64,
    rng: &mut R,
) -> Result<Vec<f64>> {
    let n_samples = (n_out.div_ceil(UPSAMPLE) + 1).max(10);
    let magnitude = spectral_magnitude(n_samples)?;
    let n_fft = magnitude.len();

    let mut z: Vec<Complex64> = magnitude
        .iter()
        .map(|&m| {
            let re: f64 = rng.sample(StandardNormal);
            let im: f64 = rng.sample(StandardNormal);
            Complex64::new(m * re, m * im)
        })
        .collect();

    FftPlanner::new().plan_fft_inverse(n_fft).process(&mut z);

    // Unnormalised inverse: divide by n_fft, then scale by sqrt(n_fft)
    let scale = 1.0 / (n_fft as f64).sqrt();
    let y: Vec<f64> = z[..n_samples].iter().map(|c| c.re * scale).collect();

    let sigma = noise_sigma(spont);
    Ok(resample(&y, UPSAMPLE as f64, n_out)
        .into_iter()
        .map(|v| v * sigma)
        .collect())
}
