//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges and addresses.
//! All violations are collected rather than stopping at the first.

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::RelayConfig;

/// A single semantic problem with a configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending key, e.g. `fetch.max_attempts`.
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError {
            field: "listener.bind_address",
            message: format!("'{}' is not a socket address", config.listener.bind_address),
        });
    }

    if config.fetch.max_attempts == 0 {
        errors.push(ValidationError {
            field: "fetch.max_attempts",
            message: "must be at least 1".to_string(),
        });
    }

    if config.fetch.timeout_ms == 0 {
        errors.push(ValidationError {
            field: "fetch.timeout_ms",
            message: "must be greater than 0".to_string(),
        });
    }

    if config.fetch.min_backoff_ms > config.fetch.max_backoff_ms {
        errors.push(ValidationError {
            field: "fetch.min_backoff_ms",
            message: format!(
                "{} exceeds max_backoff_ms ({})",
                config.fetch.min_backoff_ms, config.fetch.max_backoff_ms
            ),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError {
            field: "observability.metrics_address",
            message: format!(
                "'{}' is not a socket address",
                config.observability.metrics_address
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
