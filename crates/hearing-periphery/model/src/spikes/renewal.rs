// Copyright 2025 Hearing Model Contributors
// SPDX-License-Identifier: Apache-2.0

//! Renewal process with refractory recovery, drawn by time rescaling
//!
//! The integral of `rate(t) * w(t - t_last)` is compared against a unit
//! exponential; a spike fires when it is reached and a new threshold is
//! drawn. `w` is the refractory recovery function:
//!
//! ```text
//! w(s) = 0                               s < t_abs
//!      = 1 - exp(-(s - t_abs) / t_rel)   otherwise
//! ```

use rand_chacha::ChaCha8Rng;

use super::{adapted_rel_refractory, unit_exponential, SpikeGenerator, SpikeTrain};
use crate::synapse::SynapseOutput;

#[derive(Debug, Clone, PartialEq)]
pub struct Renewal {
    pub abs_refractory: f64,
    pub rel_refractory: f64,
}

impl Renewal {
    pub fn new(abs_refractory: f64, rel_refractory: f64) -> Self {
        Self {
            abs_refractory,
            rel_refractory,
        }
    }

    /// Fraction of the nominal rate available `since_spike` seconds after a spike
    pub fn recovery(&self, since_spike: f64, rate: f64) -> f64 {
        if since_spike < self.abs_refractory {
            return 0.0;
        }
        let t_rel = adapted_rel_refractory(self.rel_refractory, rate);
        if t_rel <= 0.0 {
            1.0
        } else {
            1.0 - (-(since_spike - self.abs_refractory) / t_rel).exp()
        }
    }
}

impl SpikeGenerator for Renewal {
    fn model_name(&self) -> &'static str {
        "renewal"
    }

    fn generate(&self, synapse: &SynapseOutput, rng: &mut ChaCha8Rng) -> SpikeTrain {
        let tdres = synapse.time_resolution;
        let mut indices = Vec::new();
        let mut last_spike: Option<usize> = None;
        let mut threshold = unit_exponential(rng);
        let mut integral = 0.0;

        for (k, &rate) in synapse.rate.iter().enumerate() {
            let rate = rate.max(0.0);
            let w = match last_spike {
                Some(last) => self.recovery((k - last) as f64 * tdres, rate),
                None => 1.0,
            };
            integral += rate * w * tdres;
            if integral >= threshold {
                indices.push(k);
                last_spike = Some(k);
                integral = 0.0;
                threshold = unit_exponential(rng);
            }
        }

        SpikeTrain::new(indices, tdres)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn constant(rate: f64, n: usize, tdres: f64) -> SynapseOutput {
        SynapseOutput {
            drive: vec![rate; n],
            rate: vec![rate; n],
            redocking_time: vec![14e-3; n],
            time_resolution: tdres,
            n_sites: 4,
        }
    }

    #[test]
    fn test_recovery_function() {
        let r = Renewal::new(0.6e-3, 0.6e-3);
        assert_eq!(r.recovery(0.5e-3, 50.0), 0.0);
        assert_eq!(r.recovery(0.6e-3, 50.0), 0.0);
        assert!(r.recovery(3e-3, 50.0) > 0.98);
        assert_eq!(Renewal::new(0.0, 0.0).recovery(0.0, 50.0), 1.0);
    }

    #[test]
    fn test_absolute_refractory_respected() {
        let r = Renewal::new(0.6e-3, 0.6e-3);
        let tdres = 1e-5;
        let syn = constant(5000.0, 100_000, tdres);
        let train = r.generate(&syn, &mut ChaCha8Rng::seed_from_u64(11));
        assert!(train.len() > 10);
        for pair in train.indices.windows(2) {
            assert!((pair[1] - pair[0]) as f64 * tdres >= 0.6e-3);
        }
    }

    #[test]
    fn test_mean_rate_matches_poisson_limit() {
        // far below the refractory limit the process is close to Poisson
        let r = Renewal::new(0.0, 0.0);
        let tdres = 1e-5;
        let rate = 100.0;
        let syn = constant(rate, 1_000_000, tdres);
        let train = r.generate(&syn, &mut ChaCha8Rng::seed_from_u64(5));
        let expected = rate * 10.0;
        let n = train.len() as f64;
        // 5 standard deviations of a Poisson count
        assert!((n - expected).abs() < 5.0 * expected.sqrt(), "{n}");
    }

    #[test]
    fn test_zero_rate_never_fires() {
        let r = Renewal::new(0.6e-3, 0.6e-3);
        let syn = constant(0.0, 10_000, 1e-5);
        assert!(r
            .generate(&syn, &mut ChaCha8Rng::seed_from_u64(1))
            .is_empty());
    }

    #[test]
    fn test_same_rng_same_train() {
        let r = Renewal::new(0.6e-3, 0.6e-3);
        let syn = constant(300.0, 50_000, 1e-5);
        let a = r.generate(&syn, &mut ChaCha8Rng::seed_from_u64(3));
        let b = r.generate(&syn, &mut ChaCha8Rng::seed_from_u64(3));
        assert_eq!(a, b);
    }
}
