// Copyright 2025 Hearing Model Contributors
// SPDX-License-Identifier: Apache-2.0

//! Inner hair cell transduction

use super::filter::BasilarMembraneResponse;
use super::tuning::cochlear_latency;
use crate::dsp::LowPassCascade;
use crate::error::{ensure_finite, PeripheryError, Result};

/// Sign-preserving logarithmic compression with level-dependent asymmetry
pub fn nl_logarithm(x: f64, slope: f64, asym: f64) -> f64 {
    const CORNER_DB: f64 = 80.0;
    let strength = 20.0e6 / 10f64.powf(CORNER_DB / 20.0);
    let xx = (1.0 + strength * x.abs()).ln() * slope;
    if x < 0.0 {
        let spl = 20.0 * (-x / 20e-6).log10();
        let asym_t = asym - (asym - 1.0) / (1.0 + (spl / 5.0).exp());
        -xx / asym_t
    } else {
        xx
    }
}

/// IHC receptor potential from the C1/C2 outputs, delayed by the
/// cochlear latency of `cf`
///
/// # Errors
/// `InvalidParameter` for `cihc` outside [0, 1], `NumericalInstability` on
/// non-finite output
pub fn inner_hair_cell(
    bm: &BasilarMembraneResponse,
    cf: f64,
    tdres: f64,
    cihc: f64,
) -> Result<Vec<f64>> {
    if !(0.0..=1.0).contains(&cihc) {
        return Err(PeripheryError::invalid(format!(
            "cihc = {} is out of bounds [0, 1]",
            cihc
        )));
    }

    let mut lowpass = LowPassCascade::new(3000.0, tdres, 7, 1.0);
    let potential: Vec<f64> = bm
        .c1
        .iter()
        .zip(&bm.c2)
        .map(|(&c1, &c2)| {
            let c1_term = nl_logarithm(cihc * c1, 0.1, 3.0);
            let c2_drive = c2 * c2.abs() * cf / 10.0 * cf / 2e3;
            let c2_term = -nl_logarithm(c2_drive, 0.2, 1.0);
            lowpass.process(c1_term + c2_term)
        })
        .collect();

    let delay = (cochlear_latency(cf) / tdres).ceil() as usize;
    let n = potential.len();
    let mut out = vec![0.0; n];
    if delay < n {
        out[delay..].copy_from_slice(&potential[..n - delay]);
    }

    ensure_finite("inner hair cell", &out)?;
    Ok(out)
}
