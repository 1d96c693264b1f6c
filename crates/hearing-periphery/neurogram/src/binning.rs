// Copyright 2025 Hearing Model Contributors
// SPDX-License-Identifier: Apache-2.0

//! Mapping of sample indices to neurogram bins

use hearing_periphery_model::{PeripheryError, Result, SpikeTrain};

/// Relative tolerance when checking that a bin width is a whole number of samples
const RATIO_TOLERANCE: f64 = 1e-6;

/// Samples per bin and bin count for one `create`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinLayout {
    pub factor: usize,
    pub n_bins: usize,
}

impl BinLayout {
    /// # Errors
    /// `InvalidBinWidth` unless `bin_width` is a positive whole multiple of
    /// `time_resolution` that divides `n_samples` evenly
    pub fn new(bin_width: f64, time_resolution: f64, n_samples: usize) -> Result<Self> {
        if !(bin_width > 0.0 && bin_width.is_finite()) {
            return Err(PeripheryError::InvalidBinWidth(format!(
                "bin width must be positive, got {}",
                bin_width
            )));
        }
        let ratio = bin_width / time_resolution;
        let factor = ratio.round();
        if factor < 1.0 || (ratio - factor).abs() > RATIO_TOLERANCE * ratio.max(1.0) {
            return Err(PeripheryError::InvalidBinWidth(format!(
                "bin width {} s is not a multiple of the sampling period {} s",
                bin_width, time_resolution
            )));
        }
        let factor = factor as usize;
        if n_samples % factor != 0 {
            return Err(PeripheryError::InvalidBinWidth(format!(
                "{} samples do not divide into bins of {} samples",
                n_samples, factor
            )));
        }
        Ok(Self {
            factor,
            n_bins: n_samples / factor,
        })
    }

    #[inline]
    pub fn bin_of(&self, sample: usize) -> usize {
        sample / self.factor
    }

    /// Add one spike train to a row of counts
    pub fn accumulate(&self, counts: &mut [u32], train: &SpikeTrain) {
        for &index in &train.indices {
            if let Some(slot) = counts.get_mut(self.bin_of(index)) {
                *slot += 1;
            }
        }
    }
}

/// Element-wise sum of two count rows
pub fn merge_counts(mut a: Vec<u32>, b: Vec<u32>) -> Vec<u32> {
    for (x, y) in a.iter_mut().zip(b) {
        *x += y;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_bins() {
        let layout = BinLayout::new(1e-5, 1e-5, 27_500).unwrap();
        assert_eq!(layout, BinLayout { factor: 1, n_bins: 27_500 });
    }

    #[test]
    fn test_multiple_bins() {
        let layout = BinLayout::new(5e-4, 1e-5, 27_500).unwrap();
        assert_eq!(layout.factor, 50);
        assert_eq!(layout.n_bins, 550);
        assert_eq!(layout.bin_of(49), 0);
        assert_eq!(layout.bin_of(50), 1);
    }

    #[test]
    fn test_rejects_fractional_ratio() {
        let err = BinLayout::new(1.5e-5, 1e-5, 30_000).unwrap_err();
        assert!(matches!(err, PeripheryError::InvalidBinWidth(_)));
        assert!(BinLayout::new(0.5e-5, 1e-5, 30_000).is_err());
    }

    #[test]
    fn test_rejects_uneven_division() {
        assert!(BinLayout::new(1e-3, 1e-5, 27_550).is_err());
    }

    #[test]
    fn test_rejects_non_positive() {
        assert!(BinLayout::new(0.0, 1e-5, 100).is_err());
        assert!(BinLayout::new(-1e-5, 1e-5, 100).is_err());
        assert!(BinLayout::new(f64::NAN, 1e-5, 100).is_err());
    }

    #[test]
    fn test_accumulate_and_merge() {
        let layout = BinLayout::new(2e-5, 1e-5, 8).unwrap();
        let mut counts = vec![0u32; layout.n_bins];
        layout.accumulate(&mut counts, &SpikeTrain::new(vec![0, 1, 5, 7], 1e-5));
        assert_eq!(counts, vec![2, 0, 1, 1]);
        assert_eq!(merge_counts(counts, vec![1, 1, 1, 1]), vec![3, 1, 2, 2]);
    }
}
