//! Route handlers.

use std::time::Instant;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::http::response::{ApiError, PdfDocument};
use crate::http::server::AppState;
use crate::observability::metrics;

#[derive(Debug, Serialize)]
pub struct ServiceStatus {
    pub status: &'static str,
}

/// Liveness check.
pub async fn index() -> Json<ServiceStatus> {
    Json(ServiceStatus { status: "running" })
}

#[derive(Debug, Deserialize)]
pub struct DownloadParams {
    pub pdf_url: Option<String>,
}

/// Relay the document at `pdf_url`.
pub async fn download_pdf(
    State(state): State<AppState>,
    params: Result<Query<DownloadParams>, QueryRejection>,
) -> Result<PdfDocument, ApiError> {
    let start = Instant::now();

    let result = relay(&state, params).await;

    let status = match &result {
        Ok(_) => 200,
        Err(e) => e.status_code().as_u16(),
    };
    metrics::record_request("/download-pdf", status, start);

    result
}

async fn relay(
    state: &AppState,
    params: Result<Query<DownloadParams>, QueryRejection>,
) -> Result<PdfDocument, ApiError> {
    let pdf_url = match params {
        Ok(Query(DownloadParams { pdf_url: Some(url) })) if !url.is_empty() => url,
        Ok(_) => return Err(ApiError::MissingPdfUrl),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Undecodable query string");
            return Err(ApiError::MissingPdfUrl);
        }
    };

    tracing::info!(pdf_url = %pdf_url, "Relaying PDF");
    let pdf = state.fetcher.fetch(&pdf_url).await?;
    Ok(PdfDocument(pdf.bytes))
}
