//! Attempt budget for origin fetches.
//!
//! The retry loop is driven by an explicit counter instead of error
//! propagation: every failed attempt asks the budget whether another one is
//! allowed, and the answer is one of two variants of [`RetryDecision`].

/// What to do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Pause, then make another attempt.
    Retry,
    /// The budget is spent; give up.
    Exhausted,
}

/// Bounded attempt counter. Always allows at least one attempt.
#[derive(Debug, Clone)]
pub struct AttemptBudget {
    max_attempts: u32,
    used: u32,
}

impl AttemptBudget {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            used: 0,
        }
    }

    /// Claim the next attempt, returning its 1-based number, or `None` once
    /// the budget is spent.
    pub fn begin_attempt(&mut self) -> Option<u32> {
        if self.used >= self.max_attempts {
            return None;
        }
        self.used += 1;
        Some(self.used)
    }

    /// Decide what follows a failure of the attempt just made.
    pub fn after_failure(&self) -> RetryDecision {
        if self.used < self.max_attempts {
            RetryDecision::Retry
        } else {
            RetryDecision::Exhausted
        }
    }

    pub fn attempts_made(&self) -> u32 {
        self.used
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}
