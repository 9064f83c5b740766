//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and fetcher produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Request ID from the middleware appears on every request span
//! - Metrics are off by default; the macros are no-ops without a recorder

pub mod logging;
pub mod metrics;
