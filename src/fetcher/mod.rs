//! PDF fetcher subsystem.
//!
//! # Data Flow
//! ```text
//! target URL
//!     → headers.rs (fresh random User-Agent + fixed Accept/DNT headers)
//!     → pdf.rs (GET with timeout, status + content-type check)
//!     → on failure: resilience (retry decision, jittered pause)
//!     → FetchedPdf | FetchError::RetriesExhausted
//! ```

pub mod headers;
pub mod pdf;

pub use headers::{RandomHeaderSet, PDF_ACCEPT, USER_AGENTS};
pub use pdf::{
    is_pdf_content_type, AttemptFailure, AttemptOutcome, FetchError, FetchSettings, FetchedPdf,
    PdfFetcher,
};
