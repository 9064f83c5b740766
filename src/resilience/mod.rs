//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Fetch attempt fails:
//!     → retries.rs (attempt budget: retry or exhausted)
//!     → backoff.rs (jittered pause, then next attempt)
//! ```
//!
//! # Design Decisions
//! - Fixed attempt budget; exhaustion is an explicit state, not an error path
//! - Pauses are uniformly jittered, never after the last attempt
//! - Sleeping goes through a trait so tests skip real waits

pub mod backoff;
pub mod retries;

pub use backoff::{JitteredBackoff, Sleeper, TokioSleeper};
pub use retries::{AttemptBudget, RetryDecision};
