//! PDF relay.
//!
//! Fetches a PDF from a caller-supplied URL and serves it back with
//! permissive CORS, so in-browser viewers can display documents from
//! origins they could not fetch directly.

// Core subsystems
pub mod config;
pub mod fetcher;
pub mod http;

// Cross-cutting concerns
pub mod entropy;
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::RelayConfig;
pub use fetcher::PdfFetcher;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
