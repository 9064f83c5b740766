//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with both handlers
//! - Wire up middleware (CORS, request ID, tracing, panic recovery)
//! - Serve on a listener until shutdown is signalled

use std::sync::Arc;

use axum::{body::Body, http::Request, routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::config::RelayConfig;
use crate::fetcher::{FetchError, FetchSettings, PdfFetcher};
use crate::http::handlers::{download_pdf, index};
use crate::http::request::{propagate_request_id_layer, request_id_of, set_request_id_layer};
use crate::http::response::panic_response;
use crate::lifecycle::shutdown::recv_shutdown;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<PdfFetcher>,
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
}

impl HttpServer {
    /// Create a server whose fetcher follows `config.fetch`.
    pub fn new(config: RelayConfig) -> Result<Self, FetchError> {
        let fetcher = PdfFetcher::new(FetchSettings::from(&config.fetch))?;
        Ok(Self::with_fetcher(config, Arc::new(fetcher)))
    }

    /// Create a server around an existing fetcher.
    pub fn with_fetcher(config: RelayConfig, fetcher: Arc<PdfFetcher>) -> Self {
        let router = Self::build_router(AppState { fetcher });
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Outermost first: CORS, request ID, tracing, panic recovery.
    pub fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/", get(index))
            .route("/download-pdf", get(download_pdf))
            .with_state(state)
            .layer(CatchPanicLayer::custom(panic_response))
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id_of(request),
                    )
                }),
            )
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
            .layer(CorsLayer::permissive())
    }

    /// The fully layered router, e.g. for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` fires, then drain in-flight
    /// requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            max_attempts = self.config.fetch.max_attempts,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(recv_shutdown(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}
