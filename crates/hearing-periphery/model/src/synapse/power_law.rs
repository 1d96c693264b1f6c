// Copyright 2025 Hearing Model Contributors
// SPDX-License-Identifier: Apache-2.0

//! Power-law adaptation of the IHC/AN synapse
//!
//! The IHC potential is mapped to a drive, decimated to [`SYNAPSE_RATE`]
//! and passed through a fast and a slow power-law adaptation branch. The
//! `Approximate` implementation replaces the power-law kernels by fixed IIR
//! cascades, `Actual` evaluates the convolutions exactly.

use hearing_config::PowerLawImplementation;

use crate::dsp::{resample, Biquad};

/// Sampling rate of the adaptation stage (Hz)
pub const SYNAPSE_RATE: f64 = 10e3;

const ALPHA1: f64 = 1.5e-6 * 100e3;
const ALPHA2: f64 = 1e-2 * 100e3;
const BETA1: f64 = 5e-4;
const BETA2: f64 = 1e-1;

/// Stimulus samples per synapse sample
pub fn resample_factor(tdres: f64) -> usize {
    (1.0 / (tdres * SYNAPSE_RATE)).round().max(1.0) as usize
}

/// Leading pad (stimulus samples) that lets the adaptation settle
pub fn delay_points(cf: f64) -> usize {
    (7500.0 / (cf / 1e3)).floor() as usize
}

/// Map the IHC potential to the adaptation input and decimate it
///
/// The returned sequence covers `delay_points(cf)` samples of resting
/// drive, the stimulus, and a trailing pad at the final value.
pub fn map_to_power_law(ihc: &[f64], spont: f64, cf: f64, tdres: f64) -> Vec<f64> {
    let cfslope = spont.powf(0.19) * 10f64.powf(-0.87);
    let cfconst = 0.1 * spont.log10().powi(2) + 0.56 * spont.log10() - 0.84;
    let cfsat = 10f64.powf(cfslope * 8965.5 / 1e3 + cfconst);
    let cf_factor = cfsat.min(10f64.powf(cfslope * cf / 1e3 + cfconst)) * 2.0;
    let mult_fac = (2.95 * (1.5 - spont / 100.0).max(1.0)).max(4.3 - 0.2 * cf / 1e3);

    let map = |v: f64| {
        let m = 10f64.powf(0.9 * (v.abs() * cf_factor).log10() + mult_fac);
        if v < 0.0 {
            -m
        } else {
            m
        }
    };

    let rest = 3.0 * spont;
    let dp = delay_points(cf);
    let first = ihc.first().map(|&v| map(v)).unwrap_or(0.0);

    let mut input = Vec::with_capacity(ihc.len() + 3 * dp);
    input.extend(std::iter::repeat(first + rest).take(dp));
    input.extend(ihc.iter().map(|&v| map(v) + rest));
    let last = input.last().copied().unwrap_or(rest);
    input.extend(std::iter::repeat(last).take(2 * dp));

    let factor = resample_factor(tdres);
    let out_len = input.len().div_ceil(factor);
    resample(&input, 1.0 / factor as f64, out_len)
}

/// Run both adaptation branches; `noise` is added to the fast branch
///
/// `input` and `noise` must be at least `n` samples long.
pub fn adapt(
    input: &[f64],
    noise: &[f64],
    n: usize,
    implementation: PowerLawImplementation,
) -> Vec<f64> {
    match implementation {
        PowerLawImplementation::Approximate => adapt_approximate(input, noise, n),
        PowerLawImplementation::Actual => adapt_actual(input, noise, n),
    }
}

fn adapt_approximate(input: &[f64], noise: &[f64], n: usize) -> Vec<f64> {
    // Slow branch
    let mut slow = [
        Biquad::from_feedback(
            [1.0e-3, -1.0e-3 * 0.994466986569624, 1.0e-3 * 0.000000000002347],
            1.992127932802320,
            -0.992140616993846,
        ),
        Biquad::from_feedback(
            [1.0, -1.997855276593802, 0.997855827934345],
            1.999195329360981,
            -0.999195402928777,
        ),
        Biquad::from_feedback(
            [1.0, 0.798261718184977, 0.199131619874064],
            -0.798261718183851,
            -0.199131619873480,
        ),
    ];
    // Fast branch
    let mut fast = [
        Biquad::from_feedback(
            [0.2, -0.2 * 0.173492003319319, 0.2 * 0.000000172983796],
            0.491115852967412,
            -0.055050209956838,
        ),
        Biquad::from_feedback(
            [1.0, -0.803462163297112, 0.154962026341513],
            1.084520302502860,
            -0.288760329320566,
        ),
        Biquad::from_feedback(
            [1.0, -1.416084732997016, 0.496615555008723],
            1.588427084535629,
            -0.628138993662508,
        ),
        Biquad::from_feedback(
            [1.0, -1.830362725074550, 0.836399964176882],
            1.886287488516458,
            -0.888972875389923,
        ),
        Biquad::from_feedback(
            [1.0, -1.983165053215032, 0.983193027347456],
            1.989549282714008,
            -0.989558985673023,
        ),
    ];

    let (mut i1, mut i2) = (0.0, 0.0);
    (0..n)
        .map(|k| {
            let out1 = (input[k] + noise[k] - ALPHA1 * i1).max(0.0);
            let out2 = (input[k] - ALPHA2 * i2).max(0.0);
            i1 = fast.iter_mut().fold(out1, |acc, s| s.process(acc));
            i2 = slow.iter_mut().fold(out2, |acc, s| s.process(acc));
            out1 + out2
        })
        .collect()
}

fn adapt_actual(input: &[f64], noise: &[f64], n: usize) -> Vec<f64> {
    let binwidth = 1.0 / SYNAPSE_RATE;
    let mut out1 = Vec::with_capacity(n);
    let mut out2 = Vec::with_capacity(n);
    let (mut i1, mut i2) = (0.0, 0.0);
    let mut out = Vec::with_capacity(n);
    for k in 0..n {
        out1.push((input[k] + noise[k] - ALPHA1 * i1).max(0.0));
        out2.push((input[k] - ALPHA2 * i2).max(0.0));
        i1 = 0.0;
        i2 = 0.0;
        for j in 0..=k {
            let lag = (k - j) as f64 * binwidth;
            i1 += out1[j] * binwidth / (lag + BETA1);
            i2 += out2[j] * binwidth / (lag + BETA2);
        }
        out.push(out1[k] + out2[k]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factors() {
        assert_eq!(resample_factor(1e-5), 10);
        assert_eq!(resample_factor(1.0 / 200e3), 20);
        assert_eq!(resample_factor(1.0 / 500e3), 50);
        assert_eq!(delay_points(1e3), 7500);
        assert_eq!(delay_points(5e3), 1500);
    }

    #[test]
    fn test_silence_maps_to_resting_drive() {
        let spont = 50.0;
        let out = map_to_power_law(&vec![0.0; 2000], spont, 5e3, 1e-5);
        assert_eq!(out.len(), (2000 + 3 * 1500usize).div_ceil(10));
        let mid = out[out.len() / 2];
        assert!((mid - 3.0 * spont).abs() < 1e-2 * spont, "{mid}");
    }

    #[test]
    fn test_mapping_is_monotone_in_ihc() {
        let lo = map_to_power_law(&vec![1e-3; 3000], 50.0, 5e3, 1e-5);
        let hi = map_to_power_law(&vec![1e-2; 3000], 50.0, 5e3, 1e-5);
        let k = lo.len() / 2;
        assert!(hi[k] > lo[k]);
    }

    #[test]
    fn test_adaptation_reduces_sustained_drive() {
        let n = 2000;
        let input = vec![1000.0; n];
        let noise = vec![0.0; n];
        for implementation in [
            PowerLawImplementation::Approximate,
            PowerLawImplementation::Actual,
        ] {
            let out = adapt(&input, &noise, n, implementation);
            assert_eq!(out.len(), n);
            assert!(out[n - 1] < out[0], "{implementation:?}");
            assert!(out.iter().all(|&v| v >= 0.0));
        }
    }

    #[test]
    fn test_implementations_agree_roughly() {
        let n = 1000;
        let input = vec![500.0; n];
        let noise = vec![0.0; n];
        let a = adapt(&input, &noise, n, PowerLawImplementation::Approximate);
        let b = adapt(&input, &noise, n, PowerLawImplementation::Actual);
        let ratio = a[n - 1] / b[n - 1];
        assert!(ratio > 0.5 && ratio < 2.0, "{} vs {}", a[n - 1], b[n - 1]);
    }
}
