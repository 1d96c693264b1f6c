// Copyright 2025 Hearing Model Contributors
// SPDX-License-Identifier: Apache-2.0

//! Worker pool selection

use hearing_periphery_model::{PeripheryError, Result};

/// Run `op` on the global rayon pool, or on a dedicated pool of
/// `max_threads` workers when non-zero
pub(crate) fn run_in_pool<T, F>(max_threads: usize, op: F) -> Result<T>
where
    T: Send,
    F: FnOnce() -> T + Send,
{
    if max_threads == 0 {
        return Ok(op());
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(max_threads)
        .thread_name(|i| format!("neurogram-worker-{}", i))
        .build()
        .map_err(|e| PeripheryError::WorkerPool(e.to_string()))?;
    Ok(pool.install(op))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedicated_pool_size() {
        let threads = run_in_pool(3, rayon::current_num_threads).unwrap();
        assert_eq!(threads, 3);
    }

    #[test]
    fn test_global_pool() {
        assert_eq!(run_in_pool(0, || 7).unwrap(), 7);
    }
}
