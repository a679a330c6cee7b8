//! FizzBuzz server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server (request ID, trace, timeout)
//!                         │
//!                         ▼
//!                     http::handlers ──▶ fizzbuzz::validation ──▶ stats::counter
//!                         │                                          │
//!                         ▼                                          ▼
//!     Client Response ◀── http::response ◀── fizzbuzz::generator   most frequent
//!
//!     Cross-cutting: config, observability (logs, metrics), lifecycle
//! ```

use clap::Parser;

use fizzbuzz_server::cli::Cli;
use fizzbuzz_server::config::resolve_config;
use fizzbuzz_server::lifecycle::startup;
use fizzbuzz_server::observability::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = resolve_config(cli.config.as_deref(), &cli.overrides())?;
    logging::init_logging(&config.observability)?;

    tracing::info!("fizzbuzz-server v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        address = %config.listener.socket_address(),
        request_timeout_secs = config.timeouts.request_secs,
        metrics_enabled = config.observability.metrics_enabled,
        "Configuration loaded"
    );

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
