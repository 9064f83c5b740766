//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum router, middleware stack)
//!     → request.rs (request ID assigned and propagated)
//!     → handlers.rs (`/` liveness, `/download-pdf` relay)
//!     → fetcher (origin fetch with retries)
//!     → response.rs (PDF body or JSON error)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use response::{ApiError, PdfDocument};
pub use server::{AppState, HttpServer};
