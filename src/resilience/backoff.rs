//! Jittered backoff between fetch attempts.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::entropy::Entropy;

/// Uniformly jittered pause, drawn fresh for every gap between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JitteredBackoff {
    min: Duration,
    max: Duration,
}

impl JitteredBackoff {
    /// Bounds are reordered if given backwards.
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    /// Draw the next pause from `entropy`, clamped into `[min, max]`.
    pub fn next_delay(&self, entropy: &dyn Entropy) -> Duration {
        entropy
            .duration_between(self.min, self.max)
            .clamp(self.min, self.max)
    }
}

impl Default for JitteredBackoff {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), Duration::from_secs(3))
    }
}

/// Suspends the current request between attempts.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;
}

/// [`Sleeper`] backed by `tokio::time::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(tokio::time::sleep(duration))
    }
}
