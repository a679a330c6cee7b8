//! Startup orchestration.
//!
//! # Responsibilities
//! - Start the metrics exporter when enabled
//! - Bind the listener and begin accepting traffic
//! - Stop on a shutdown signal, granting in-flight requests a deadline
//!
//! # Design Decisions
//! - Fail fast: any startup error is returned before traffic is accepted
//! - Listener binds last (traffic only when ready)

use std::future::Future;
use std::net::{AddrParseError, SocketAddr};
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinError;

use crate::config::ServerConfig;
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },
    #[error("invalid metrics address: {0}")]
    MetricsAddress(#[from] AddrParseError),
    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),
    #[error("server error: {0}")]
    Serve(std::io::Error),
    #[error("server task failed: {0}")]
    Task(#[from] JoinError),
}

/// Run the service with a validated config until SIGINT/SIGTERM.
pub async fn run(config: ServerConfig) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let address = config.listener.socket_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })?;

    serve_until(listener, config, signals::wait_for_signal()).await
}

/// Serve on `listener` until `signal` resolves, then shut down gracefully.
///
/// In-flight requests get `timeouts.shutdown_secs` to finish; after that the
/// server task is aborted.
pub async fn serve_until<F>(
    listener: TcpListener,
    config: ServerConfig,
    signal: F,
) -> Result<(), StartupError>
where
    F: Future<Output = ()>,
{
    let grace = Duration::from_secs(config.timeouts.shutdown_secs);
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    let mut handle = tokio::spawn(server.run(listener, shutdown.subscribe()));

    tokio::select! {
        result = &mut handle => {
            tracing::warn!("HTTP server exited before a shutdown signal");
            return result?.map_err(StartupError::Serve);
        }
        _ = signal => {}
    }

    tracing::info!(grace_secs = grace.as_secs(), "Shutting down, draining in-flight requests");
    shutdown.trigger();

    match tokio::time::timeout(grace, &mut handle).await {
        Ok(result) => result?.map_err(StartupError::Serve),
        Err(_) => {
            tracing::warn!("Graceful shutdown timed out, dropping remaining connections");
            handle.abort();
            Ok(())
        }
    }
}
