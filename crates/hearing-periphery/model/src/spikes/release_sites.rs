// Copyright 2025 Hearing Model Contributors
// SPDX-License-Identifier: Apache-2.0

//! Stochastic release from a small number of independent sites
//!
//! Each site redocks a vesicle after an exponential time with the adaptive
//! mean redocking time, then integrates `drive / n_sites` until a unit
//! exponential interval is exceeded and releases. A release becomes a
//! spike unless it falls inside the stochastic refractory period of the
//! previous spike. Sites start from release times drawn in the past so
//! the process begins in its stationary regime.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::{adapted_rel_refractory, SpikeGenerator, SpikeTrain};
use crate::synapse::{SynapseOutput, VesiclePool};

#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseSites {
    pub abs_refractory: f64,
    pub rel_refractory: f64,
    pub pool: VesiclePool,
}

impl ReleaseSites {
    pub fn new(abs_refractory: f64, rel_refractory: f64, spont: f64) -> Self {
        Self {
            abs_refractory,
            rel_refractory,
            pool: VesiclePool::new(spont),
        }
    }
}

/// `ln U` with `U` in (0, 1]
#[inline]
fn ln_uniform(rng: &mut ChaCha8Rng) -> f64 {
    (1.0 - rng.gen::<f64>()).ln()
}

impl SpikeGenerator for ReleaseSites {
    fn model_name(&self) -> &'static str {
        "release_sites"
    }

    fn generate(&self, synapse: &SynapseOutput, rng: &mut ChaCha8Rng) -> SpikeTrain {
        let tdres = synapse.time_resolution;
        let drive = &synapse.drive;
        let total = drive.len() as i64;
        if total == 0 {
            return SpikeTrain::new(Vec::new(), tdres);
        }

        let pool = &self.pool;
        let n_sites = pool.n_sites;
        let sites = n_sites as f64;

        let mut redock: Vec<f64> = (0..n_sites)
            .map(|_| -pool.t_rd_init * ln_uniform(rng))
            .collect();

        // Release times before the start, earliest first
        let s0 = drive[0].max(0.1);
        let mut pre_release: Vec<i64> = (0..n_sites)
            .map(|_| {
                let bins = ((sites / s0 + pool.t_rd_init) * ln_uniform(rng) / tdres).ceil();
                bins.max(-(total as f64)) as i64
            })
            .collect();
        pre_release.sort_unstable();

        let mut previous_release: Vec<f64> =
            pre_release.iter().map(|&b| b as f64 * tdres).collect();
        let mut elapsed = vec![0.0; n_sites];
        let mut integral = vec![0.0; n_sites];
        let mut interval = vec![0.0; n_sites];

        let k_init = pre_release[0];
        let mut refractory_end = k_init as f64 * tdres;
        let mut t_rd = pool.t_rd_init;
        let mut decay = true;
        let mut redocked_once = false;

        let mut indices = Vec::new();

        for k in k_init..total {
            let s = drive[k.max(0) as usize];

            for site in 0..n_sites {
                if k > pre_release[site] {
                    // Redocking falls inside this step
                    if (redock[site] / tdres) as i64 == (elapsed[site] / tdres) as i64 {
                        t_rd += pool.t_rd_jump;
                        decay = false;
                        redocked_once = true;
                    }
                    elapsed[site] += tdres;
                }

                if elapsed[site] >= redock[site] {
                    integral[site] += s / sites;
                }

                if integral[site] >= interval[site] && k >= pre_release[site] {
                    redock[site] = -t_rd * ln_uniform(rng);
                    let release = previous_release[site] + elapsed[site];
                    elapsed[site] = 0.0;

                    if release >= refractory_end {
                        if release >= 0.0 {
                            let index = (release / tdres) as usize;
                            if (index as i64) < total {
                                indices.push(index);
                            }
                        }
                        let t_rel = adapted_rel_refractory(self.rel_refractory, s);
                        refractory_end = release + self.abs_refractory - t_rel * ln_uniform(rng);
                    }

                    previous_release[site] = release;
                    integral[site] = 0.0;
                    interval[site] = (-ln_uniform(rng) / tdres).trunc();
                }
            }

            if decay && redocked_once {
                t_rd -= (tdres / pool.tau) * (t_rd - pool.t_rd_rest);
            } else {
                decay = true;
            }
        }

        indices.sort_unstable();
        SpikeTrain::new(indices, tdres)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn constant_drive(drive: f64, n: usize, tdres: f64) -> SynapseOutput {
        SynapseOutput {
            drive: vec![drive; n],
            rate: vec![drive; n],
            redocking_time: vec![14e-3; n],
            time_resolution: tdres,
            n_sites: 4,
        }
    }

    #[test]
    fn test_spikes_in_range_and_refractory() {
        let gen = ReleaseSites::new(0.6e-3, 0.6e-3, 100.0);
        let tdres = 1e-5;
        let syn = constant_drive(500.0, 50_000, tdres);
        let train = gen.generate(&syn, &mut ChaCha8Rng::seed_from_u64(21));
        assert!(!train.is_empty());
        assert!(train.indices.iter().all(|&i| i < 50_000));
        for pair in train.indices.windows(2) {
            // release times are truncated to sample indices
            assert!(pair[1] - pair[0] >= 59);
        }
    }

    #[test]
    fn test_rate_is_limited_by_redocking() {
        let gen = ReleaseSites::new(0.6e-3, 0.6e-3, 100.0);
        let tdres = 1e-5;
        let seconds = 1.0;
        let syn = constant_drive(5000.0, (seconds / tdres) as usize, tdres);
        let train = gen.generate(&syn, &mut ChaCha8Rng::seed_from_u64(8));
        // four sites redocking in >= 14 ms cannot sustain more than a few hundred spikes/s
        let rate = train.len() as f64 / seconds;
        assert!(rate > 50.0 && rate < 600.0, "{rate}");
    }

    #[test]
    fn test_empty_drive() {
        let gen = ReleaseSites::new(0.6e-3, 0.6e-3, 100.0);
        let syn = constant_drive(0.0, 0, 1e-5);
        assert!(gen
            .generate(&syn, &mut ChaCha8Rng::seed_from_u64(1))
            .is_empty());
    }
}
