// Copyright 2025 Hearing Model Contributors
// SPDX-License-Identifier: Apache-2.0

//! Characteristic-frequency layout of neurogram channels

use hearing_config::{CfSpacing, NeurogramConfig, Species};

use crate::dsp::log_space;
use crate::error::{PeripheryError, Result};

/// Upper edges of the critical (Bark) bands in Hz
pub const BARK_SCALE_HZ: [f64; 25] = [
    50.0, 100.0, 150.0, 250.0, 350.0, 450.0, 570.0, 700.0, 840.0, 1000.0, 1170.0, 1370.0, 1600.0,
    1850.0, 2150.0, 2500.0, 2900.0, 3400.0, 4000.0, 4800.0, 5800.0, 7000.0, 8500.0, 10500.0,
    13500.0,
];

/// Channel CFs in Hz, ordered low to high
///
/// # Errors
/// `InvalidParameter` for zero channels, an empty or inverted range, or more
/// Bark channels than the table holds inside the species CF range.
pub fn characteristic_frequencies(
    n_channels: usize,
    layout: &NeurogramConfig,
    species: Species,
) -> Result<Vec<f64>> {
    if n_channels == 0 {
        return Err(PeripheryError::invalid("a neurogram needs at least one channel"));
    }
    let (lo, hi) = species.cf_range();

    match layout.spacing {
        CfSpacing::Logarithmic => {
            let (min_cf, max_cf) = (layout.min_cf, layout.max_cf);
            if !(min_cf >= lo && max_cf <= hi && min_cf <= max_cf) {
                return Err(PeripheryError::invalid(format!(
                    "CF range [{}, {}] Hz must lie inside [{}, {}] Hz",
                    min_cf, max_cf, lo, hi
                )));
            }
            Ok(log_space(min_cf, max_cf, n_channels))
        }
        CfSpacing::Bark => {
            let usable: Vec<f64> = BARK_SCALE_HZ
                .iter()
                .copied()
                .filter(|cf| (lo..=hi).contains(cf))
                .collect();
            if n_channels > usable.len() {
                return Err(PeripheryError::invalid(format!(
                    "{} Bark channels requested but only {} bands lie in the CF range",
                    n_channels,
                    usable.len()
                )));
            }
            Ok(usable[..n_channels].to_vec())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_layout() {
        let cfs = characteristic_frequencies(3, &NeurogramConfig::default(), Species::Cat).unwrap();
        assert_eq!(cfs.len(), 3);
        assert!((cfs[0] - 250.0).abs() < 1e-9);
        assert!((cfs[2] - 16e3).abs() < 1e-6);
        assert!(cfs.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_bark_layout_skips_out_of_range_bands() {
        let layout = NeurogramConfig {
            spacing: CfSpacing::Bark,
            ..Default::default()
        };
        let cfs = characteristic_frequencies(2, &layout, Species::HumanShera).unwrap();
        assert_eq!(cfs, vec![150.0, 250.0]);

        assert!(characteristic_frequencies(23, &layout, Species::Cat).is_ok());
        assert!(matches!(
            characteristic_frequencies(24, &layout, Species::Cat),
            Err(PeripheryError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_zero_channels_rejected() {
        assert!(characteristic_frequencies(0, &NeurogramConfig::default(), Species::Cat).is_err());
    }

    #[test]
    fn test_range_outside_species() {
        let layout = NeurogramConfig {
            max_cf: 30e3,
            ..Default::default()
        };
        assert!(characteristic_frequencies(4, &layout, Species::HumanShera).is_err());
        assert!(characteristic_frequencies(4, &layout, Species::Cat).is_ok());
    }
}
