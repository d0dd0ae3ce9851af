//! Startup orchestration.
//!
//! Ordered: origin target, metrics, listener, then serve. Any failure before
//! serving is fatal and returned to `main`.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::{ConfigError, ProxyConfig, ValidationError};
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::net::{self, ListenerError};
use crate::observability::metrics;

/// Errors that stop the process before or while serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid origin: {0}")]
    Origin(#[from] ValidationError),

    #[error("metrics exporter error: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error(transparent)]
    Listener(#[from] ListenerError),

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Build every subsystem from `config` and serve until `shutdown` fires.
pub async fn run(config: ProxyConfig, shutdown: &Shutdown) -> Result<(), StartupError> {
    tracing::info!(
        bind_address = %config.listener.bind_address,
        origin = %config.origin.url,
        requests_per_second = config.rate_limit.requests_per_second,
        burst_size = config.rate_limit.burst_size,
        status_policy = ?config.relay.status_policy,
        "Configuration loaded"
    );

    let server = HttpServer::new(config)?;

    let observability = &server.config().observability;
    if observability.metrics_enabled {
        // Validation already checked the address.
        if let Ok(addr) = observability.metrics_address.parse::<SocketAddr>() {
            metrics::init_metrics(addr)?;
        }
    }

    let listener = net::bind(&server.config().listener).await?;
    server.run(listener, shutdown.subscribe()).await?;

    Ok(())
}
