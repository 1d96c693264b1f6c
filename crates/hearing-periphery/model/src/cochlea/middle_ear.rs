// Copyright 2025 Hearing Model Contributors
// SPDX-License-Identifier: Apache-2.0

//! Species-specific middle-ear transfer function

use std::f64::consts::PI;

use hearing_config::Species;

use super::check_sampling_rate;
use crate::dsp::Biquad;
use crate::error::{ensure_finite, Result};
use crate::stimulus::Stimulus;

/// Prewarping frequency of the bilinear transform (Hz)
const PREWARP_HZ: f64 = 1e3;

/// Three bilinear sections normalised by the peak middle-ear gain
#[derive(Debug, Clone)]
pub struct MiddleEar {
    sections: [Biquad; 3],
    gain_max: f64,
}

impl MiddleEar {
    pub fn new(species: Species, tdres: f64) -> Self {
        let c = 2.0 * PI * PREWARP_HZ / (PI * PREWARP_HZ * tdres).tan();
        let c2 = c * c;

        match species {
            Species::Cat => Self {
                sections: [
                    // first-order high-pass
                    Biquad::new([1.0, -1.0, 0.0], [(c + 693.48) / c, (693.48 - c) / c, 0.0]),
                    Biquad::new(
                        [
                            c2 + 1356.3 * c + 7.4417e8,
                            -2.0 * c2 + 14.8834e8,
                            c2 - 1356.3 * c + 7.4417e8,
                        ],
                        [
                            c2 + 11053.0 * c + 1.163e8,
                            -2.0 * c2 + 2.326e8,
                            c2 - 11053.0 * c + 1.163e8,
                        ],
                    ),
                    Biquad::new(
                        [5.7585e5 * c + 7.1665e7, 14.333e7, 7.1665e7 - 5.7585e5 * c],
                        [
                            c2 + 4620.0 * c + 909_059_944.0,
                            -2.0 * c2 + 2.0 * 909_059_944.0,
                            c2 - 4620.0 * c + 909_059_944.0,
                        ],
                    ),
                ],
                gain_max: 41.1405,
            },
            Species::HumanShera | Species::HumanGlasbergMoore => Self {
                sections: [
                    Biquad::new(
                        [c2 + 5.6665e3 * c, -2.0 * c2, c2 - 5.6665e3 * c],
                        [
                            c2 + 5.9761e3 * c + 2.5255e7,
                            -2.0 * c2 + 2.0 * 2.5255e7,
                            c2 - 5.9761e3 * c + 2.5255e7,
                        ],
                    ),
                    Biquad::new(
                        [
                            c2 + 5.8934e3 * c + 1.7926e8,
                            -2.0 * c2 + 2.0 * 1.7926e8,
                            c2 - 5.8934e3 * c + 1.7926e8,
                        ],
                        [
                            c2 + 6.4255e3 * c + 1.3975e8,
                            -2.0 * c2 + 2.0 * 1.3975e8,
                            c2 - 6.4255e3 * c + 1.3975e8,
                        ],
                    ),
                    Biquad::new(
                        [3.1137e3 * c + 6.9768e8, 2.0 * 6.9768e8, -3.1137e3 * c + 6.9768e8],
                        [
                            c2 + 2.4891e4 * c + 1.2700e9,
                            -2.0 * c2 + 2.0 * 1.2700e9,
                            c2 - 2.4891e4 * c + 1.2700e9,
                        ],
                    ),
                ],
                gain_max: 2.0,
            },
        }
    }

    /// Filter a pressure waveform (Pa); every call starts from rest
    pub fn process(&self, pressure: &[f64]) -> Vec<f64> {
        let mut sections = self.sections.clone();
        pressure
            .iter()
            .map(|&x| {
                let y = sections.iter_mut().fold(x, |acc, s| s.process(acc));
                y / self.gain_max
            })
            .collect()
    }
}

/// Middle-ear output for a stimulus, shared by every channel
///
/// # Errors
/// `UnsupportedSamplingRate`, or `NumericalInstability` on non-finite output
pub fn middle_ear(stimulus: &Stimulus, species: Species) -> Result<Vec<f64>> {
    check_sampling_rate(stimulus.sampling_rate())?;
    let out = MiddleEar::new(species, stimulus.time_resolution()).process(stimulus.data());
    ensure_finite("middle ear", &out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(freq: f64, fs: f64, n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| (2.0 * PI * freq * i as f64 / fs).sin())
            .collect()
    }

    fn steady_amplitude(y: &[f64]) -> f64 {
        y[y.len() / 2..].iter().fold(0.0f64, |m, v| m.max(v.abs()))
    }

    #[test]
    fn test_blocks_dc() {
        for species in [Species::Cat, Species::HumanShera] {
            let me = MiddleEar::new(species, 1e-5);
            let y = me.process(&vec![1.0; 50_000]);
            assert!(y[49_999].abs() < 1e-3, "{species:?}: {}", y[49_999]);
        }
    }

    #[test]
    fn test_mid_frequencies_pass() {
        let fs = 100e3;
        let me = MiddleEar::new(Species::Cat, 1.0 / fs);
        let low = steady_amplitude(&me.process(&tone(50.0, fs, 100_000)));
        let mid = steady_amplitude(&me.process(&tone(2000.0, fs, 100_000)));
        assert!(mid > low);
        assert!(mid > 0.1 && mid < 10.0, "{mid}");
    }

    #[test]
    fn test_zero_input_prefix() {
        let me = MiddleEar::new(Species::HumanGlasbergMoore, 1e-5);
        let mut x = vec![0.0; 100];
        x.extend(tone(1000.0, 1e5, 100));
        let y = me.process(&x);
        assert!(y[..100].iter().all(|&v| v == 0.0));
        assert_eq!(y.len(), x.len());
    }

    #[test]
    fn test_rejects_unsupported_rate() {
        let stim = Stimulus::from_samples(vec![0.0; 441], 44_100).unwrap();
        assert!(middle_ear(&stim, Species::Cat).is_err());
    }
}
