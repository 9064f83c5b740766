//! Injectable randomness.
//!
//! The fetcher draws user-agent choices and backoff pauses from an
//! [`Entropy`] provider. Production uses the thread-local RNG; tests plug in
//! scripted sequences to make header values and delays deterministic.

use rand::Rng;
use std::time::Duration;

/// Source of the random choices made per fetch attempt.
pub trait Entropy: Send + Sync {
    /// Pick an index uniformly in `0..len`. `len` is never zero.
    fn pick_index(&self, len: usize) -> usize;

    /// Pick a duration uniformly in `[min, max]`.
    fn duration_between(&self, min: Duration, max: Duration) -> Duration;
}

/// [`Entropy`] backed by `rand::thread_rng`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngEntropy;

impl Entropy for ThreadRngEntropy {
    fn pick_index(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }

    fn duration_between(&self, min: Duration, max: Duration) -> Duration {
        if max <= min {
            return min;
        }
        let secs = rand::thread_rng().gen_range(min.as_secs_f64()..=max.as_secs_f64());
        Duration::from_secs_f64(secs)
    }
}
