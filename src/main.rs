//! PDF relay server.
//!
//! ```text
//!   Client ──GET /download-pdf?pdf_url=…──▶ relay ──GET (rotating UA, retries)──▶ Origin
//!   Client ◀──application/pdf + CORS───────  relay ◀──────────── PDF bytes ────────  Origin
//! ```

use std::net::IpAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use pdf_relay::config::{load_config, RelayConfig};
use pdf_relay::lifecycle::{signals, Shutdown};
use pdf_relay::observability::{logging, metrics};
use pdf_relay::HttpServer;

#[derive(Parser)]
#[command(name = "pdf-relay")]
#[command(about = "Relay PDF documents with permissive CORS headers", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Interface to bind (overrides listener.bind_address)
    #[arg(long)]
    host: Option<IpAddr>,

    /// Port to bind (overrides listener.bind_address)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RelayConfig::default(),
    };
    config.listener.override_bind(cli.host, cli.port);

    logging::init_logging(&config.observability);

    tracing::info!("pdf-relay v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        max_attempts = config.fetch.max_attempts,
        timeout_ms = config.fetch.timeout_ms,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse()?)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            signals::wait_for_termination().await;
            shutdown.trigger();
        }
    });

    let server = HttpServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
