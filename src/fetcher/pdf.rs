//! Origin fetch with rotation, timeout and bounded retries.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use thiserror::Error;

use crate::config::FetchConfig;
use crate::entropy::{Entropy, ThreadRngEntropy};
use crate::fetcher::headers::RandomHeaderSet;
use crate::observability::metrics;
use crate::resilience::{AttemptBudget, JitteredBackoff, RetryDecision, Sleeper, TokioSleeper};

/// Tunables for [`PdfFetcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    pub max_attempts: u32,
    /// Covers connect, headers and body of a single attempt.
    pub attempt_timeout: Duration,
    pub backoff: JitteredBackoff,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self::from(&FetchConfig::default())
    }
}

impl From<&FetchConfig> for FetchSettings {
    fn from(config: &FetchConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            attempt_timeout: config.timeout(),
            backoff: JitteredBackoff::new(config.min_backoff(), config.max_backoff()),
        }
    }
}

/// A document accepted from the origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPdf {
    pub bytes: Vec<u8>,
    /// Content-Type as sent by the origin.
    pub content_type: String,
}

/// Result of a single attempt.
#[derive(Debug)]
pub enum AttemptOutcome {
    Success(FetchedPdf),
    Failure(AttemptFailure),
}

/// Why one attempt was rejected.
#[derive(Debug, Error)]
pub enum AttemptFailure {
    #[error("origin responded with status {0}")]
    Status(StatusCode),

    #[error("origin content type {content_type:?} is not a PDF")]
    NotPdf { content_type: Option<String> },

    #[error("origin did not respond in time")]
    Timeout(#[source] reqwest::Error),

    #[error("request to origin failed")]
    Transport(#[source] reqwest::Error),
}

impl AttemptFailure {
    fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AttemptFailure::Timeout(e)
        } else {
            AttemptFailure::Transport(e)
        }
    }

    /// Status received from the origin, if the attempt got that far.
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            AttemptFailure::Status(status) => Some(*status),
            AttemptFailure::NotPdf { .. } => Some(StatusCode::OK),
            AttemptFailure::Timeout(e) | AttemptFailure::Transport(e) => e.status(),
        }
    }

    fn metric_label(&self) -> &'static str {
        match self {
            AttemptFailure::Status(_) => "bad_status",
            AttemptFailure::NotPdf { .. } => "not_pdf",
            AttemptFailure::Timeout(_) => "timeout",
            AttemptFailure::Transport(_) => "transport",
        }
    }
}

/// Errors surfaced by [`PdfFetcher`].
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to fetch PDF after multiple attempts")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Option<AttemptFailure>,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl FetchError {
    /// Status the relay answers with. The origin's own status is never
    /// forwarded.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// Case-insensitive substring match on "pdf".
pub fn is_pdf_content_type(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| ct.to_ascii_lowercase().contains("pdf"))
        .unwrap_or(false)
}

/// Per-iteration state of the retry loop.
enum Step {
    Done(FetchedPdf),
    Retry(AttemptFailure),
    Exhausted(AttemptFailure),
}

/// Fetches PDF documents from origin servers.
///
/// Holds no per-request state; one instance is shared by all handlers.
pub struct PdfFetcher {
    client: reqwest::Client,
    settings: FetchSettings,
    entropy: Arc<dyn Entropy>,
    sleeper: Arc<dyn Sleeper>,
}

impl PdfFetcher {
    /// Fetcher using thread-local randomness and real sleeps.
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        Self::with_parts(settings, Arc::new(ThreadRngEntropy), Arc::new(TokioSleeper))
    }

    pub fn with_parts(
        settings: FetchSettings,
        entropy: Arc<dyn Entropy>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(settings.attempt_timeout)
            .build()?;

        Ok(Self::with_client(client, settings, entropy, sleeper))
    }

    /// Use a prepared client. Its own timeout should match
    /// `settings.attempt_timeout`.
    pub fn with_client(
        client: reqwest::Client,
        settings: FetchSettings,
        entropy: Arc<dyn Entropy>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            client,
            settings,
            entropy,
            sleeper,
        }
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    /// Fetch `url`, retrying until a PDF arrives or the budget is spent.
    pub async fn fetch(&self, url: &str) -> Result<FetchedPdf, FetchError> {
        let mut budget = AttemptBudget::new(self.settings.max_attempts);
        let mut last_failure = None;

        while let Some(attempt) = budget.begin_attempt() {
            match self.step(url, attempt, &budget).await {
                Step::Done(pdf) => return Ok(pdf),
                Step::Retry(failure) => {
                    let delay = self.settings.backoff.next_delay(self.entropy.as_ref());
                    tracing::warn!(
                        url = %url,
                        attempt,
                        origin_status = ?failure.status_code(),
                        error = %failure,
                        cause = ?std::error::Error::source(&failure),
                        delay = ?delay,
                        "PDF fetch attempt failed, retrying"
                    );
                    self.sleeper.sleep(delay).await;
                }
                Step::Exhausted(failure) => {
                    tracing::warn!(
                        url = %url,
                        attempt,
                        origin_status = ?failure.status_code(),
                        error = %failure,
                        cause = ?std::error::Error::source(&failure),
                        "PDF fetch attempt failed"
                    );
                    last_failure = Some(failure);
                    break;
                }
            }
        }

        tracing::error!(
            url = %url,
            attempts = budget.attempts_made(),
            "Giving up on PDF fetch"
        );
        Err(FetchError::RetriesExhausted {
            attempts: budget.attempts_made(),
            last: last_failure,
        })
    }

    async fn step(&self, url: &str, attempt: u32, budget: &AttemptBudget) -> Step {
        let headers = RandomHeaderSet::generate(self.entropy.as_ref());
        tracing::debug!(
            url = %url,
            attempt,
            max_attempts = budget.max_attempts(),
            user_agent = headers.user_agent(),
            "Fetching PDF"
        );

        match self.attempt(url, &headers).await {
            AttemptOutcome::Success(pdf) => {
                metrics::record_fetch_attempt("success");
                tracing::info!(url = %url, attempt, bytes = pdf.bytes.len(), "PDF fetched");
                Step::Done(pdf)
            }
            AttemptOutcome::Failure(failure) => {
                metrics::record_fetch_attempt(failure.metric_label());
                match budget.after_failure() {
                    RetryDecision::Retry => Step::Retry(failure),
                    RetryDecision::Exhausted => Step::Exhausted(failure),
                }
            }
        }
    }

    /// One GET against the origin with the given headers.
    pub async fn attempt(&self, url: &str, headers: &RandomHeaderSet) -> AttemptOutcome {
        let mut response = match self
            .client
            .get(url)
            .headers(headers.to_header_map())
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return AttemptOutcome::Failure(AttemptFailure::from_reqwest(e)),
        };

        let status = response.status();
        if status != StatusCode::OK {
            return AttemptOutcome::Failure(AttemptFailure::Status(status));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        if !is_pdf_content_type(content_type.as_deref()) {
            return AttemptOutcome::Failure(AttemptFailure::NotPdf { content_type });
        }

        let mut bytes = Vec::new();
        loop {
            match response.chunk().await {
                Ok(Some(chunk)) => bytes.extend_from_slice(&chunk),
                Ok(None) => break,
                Err(e) => return AttemptOutcome::Failure(AttemptFailure::from_reqwest(e)),
            }
        }

        AttemptOutcome::Success(FetchedPdf {
            bytes,
            content_type: content_type.unwrap_or_default(),
        })
    }
}
