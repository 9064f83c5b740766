//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! Every section is defaulted so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 5000;

/// Root configuration for the relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Origin fetch behaviour (attempts, timeout, backoff).
    pub fetch: FetchConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:5000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT)
                .to_string(),
        }
    }
}

impl ListenerConfig {
    /// Replace the host and/or port of the bind address. Parts not given
    /// keep their configured value.
    pub fn override_bind(&mut self, host: Option<IpAddr>, port: Option<u16>) {
        if host.is_none() && port.is_none() {
            return;
        }
        let current = self.bind_address.parse::<SocketAddr>().ok();
        let ip = host
            .or(current.map(|a| a.ip()))
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        let port = port.or(current.map(|a| a.port())).unwrap_or(DEFAULT_PORT);
        self.bind_address = SocketAddr::new(ip, port).to_string();
    }
}

/// Origin fetch configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Total number of attempts made against the origin.
    pub max_attempts: u32,

    /// Per-attempt timeout in milliseconds (headers and body).
    pub timeout_ms: u64,

    /// Lower bound of the jittered pause between attempts.
    pub min_backoff_ms: u64,

    /// Upper bound of the jittered pause between attempts.
    pub max_backoff_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            timeout_ms: 10_000,
            min_backoff_ms: 1_000,
            max_backoff_ms: 3_000,
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn min_backoff(&self) -> Duration {
        Duration::from_millis(self.min_backoff_ms)
    }

    pub fn max_backoff(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
