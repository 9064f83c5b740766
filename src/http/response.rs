//! Response types for the relay endpoints.
//!
//! Every failure the client sees is a JSON object with a single `error`
//! field; the status code follows the error kind.

use std::any::Any;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::fetcher::FetchError;

pub const PDF_CONTENT_DISPOSITION: &str = "inline; filename=\"displayed-pdf.pdf\"";

/// Errors returned by handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("PDF URL is required as a query parameter (e.g., ?pdf_url=...)")]
    MissingPdfUrl,

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("An error occurred: {0}")]
    Unexpected(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingPdfUrl => StatusCode::BAD_REQUEST,
            ApiError::Fetch(e) => e.status_code(),
            ApiError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

/// A relayed document, served inline.
#[derive(Debug)]
pub struct PdfDocument(pub Vec<u8>);

impl IntoResponse for PdfDocument {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/pdf"),
                (header::CONTENT_DISPOSITION, PDF_CONTENT_DISPOSITION),
            ],
            self.0,
        )
            .into_response()
    }
}

/// Turns a handler panic into the standard 500 JSON body.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    tracing::error!(panic = %detail, "Handler panicked");
    ApiError::Unexpected(detail).into_response()
}
