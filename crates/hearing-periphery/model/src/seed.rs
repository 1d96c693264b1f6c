// Copyright 2025 Hearing Model Contributors
// SPDX-License-Identifier: Apache-2.0

//! Deterministic per-stream random number generators
//!
//! Every (channel, repetition) pair draws from its own `ChaCha8Rng`, seeded
//! from a SplitMix64 mix of the top-level seed and the indices, so results
//! do not depend on which worker runs which stream.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Repetition index reserved for the synapse noise of a channel
pub const NOISE_STREAM: u64 = u64::MAX;

#[inline]
fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

pub fn stream_seed(seed: u64, channel: usize, repetition: u64) -> u64 {
    splitmix64(splitmix64(splitmix64(seed) ^ channel as u64) ^ repetition)
}

pub fn stream_rng(seed: u64, channel: usize, repetition: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(stream_seed(seed, channel, repetition))
}
