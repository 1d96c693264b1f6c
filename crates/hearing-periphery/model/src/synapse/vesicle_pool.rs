// Copyright 2025 Hearing Model Contributors
// SPDX-License-Identifier: Apache-2.0

//! Finite pool of synaptic release sites
//!
//! Mean-field form of the four-site release model: `docked` is the fraction
//! of sites holding a vesicle. Docked sites release at `drive / n_sites`
//! each, empty sites redock after a mean time `t_rd` that jumps with every
//! redocking event and relaxes back to rest.
//!
//! ```text
//! d(docked)/dt = (1 - docked) / t_rd - docked * drive / n_sites
//! d(t_rd)/dt   = -(t_rd - t_rd_rest) / tau + t_rd_jump * n_sites * (1 - docked) / t_rd
//! rate         = docked * drive
//! ```

/// Release-site parameters
#[derive(Debug, Clone, PartialEq)]
pub struct VesiclePool {
    pub n_sites: usize,
    /// Resting mean redocking time (s)
    pub t_rd_rest: f64,
    /// Jump of the mean redocking time per redocking event (s)
    pub t_rd_jump: f64,
    /// Relaxation time constant of the mean redocking time (s)
    pub tau: f64,
    /// Mean redocking time at the start of the simulation (s)
    pub t_rd_init: f64,
}

impl VesiclePool {
    pub fn new(spont: f64) -> Self {
        let t_rd_rest = 14.0e-3;
        let t_rd_jump = 0.4e-3;
        Self {
            n_sites: 4,
            t_rd_rest,
            t_rd_jump,
            tau: 60.0e-3,
            t_rd_init: t_rd_rest + 0.02e-3 * spont - t_rd_jump,
        }
    }

    /// Docked fraction in equilibrium with a constant drive
    pub fn steady_state(&self, drive: f64, t_rd: f64) -> f64 {
        let redock = 1.0 / t_rd;
        redock / (redock + drive.max(0.0) / self.n_sites as f64)
    }

    /// Release rate and mean redocking time for each drive sample
    pub fn run(&self, drive: &[f64], tdres: f64) -> (Vec<f64>, Vec<f64>) {
        let n_sites = self.n_sites as f64;
        let mut t_rd = self.t_rd_init;
        let mut docked = drive
            .first()
            .map(|&s| self.steady_state(s, t_rd))
            .unwrap_or(1.0);

        let mut rate = Vec::with_capacity(drive.len());
        let mut redocking = Vec::with_capacity(drive.len());
        for &s in drive {
            let s = s.max(0.0);
            rate.push(docked * s);
            redocking.push(t_rd);

            let empty = 1.0 - docked;
            let d_docked = empty / t_rd - docked * s / n_sites;
            let d_t_rd =
                -(t_rd - self.t_rd_rest) / self.tau + self.t_rd_jump * n_sites * empty / t_rd;
            docked = (docked + tdres * d_docked).clamp(0.0, 1.0);
            t_rd = (t_rd + tdres * d_t_rd).max(tdres);
        }
        (rate, redocking)
    }
}
