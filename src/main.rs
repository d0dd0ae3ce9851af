//! origin-proxy
//!
//! A rate-limited forwarding proxy built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌───────────────────────────────────────────────┐
//!                         │                 ORIGIN PROXY                  │
//!     Client Request      │  ┌──────────┐    ┌───────────┐                │
//!     ────────────────────┼─▶│  http    │───▶│ admission │──reject──▶ 429 │
//!                         │  │  server  │    │   gate    │                │
//!                         │  └──────────┘    └─────┬─────┘                │
//!                         │                        │ admit                │
//!                         │                        ▼                      │
//!     Client Response     │  ┌──────────┐    ┌───────────┐                │
//!     ◀───────────────────┼──│  relay   │◀───│ forwarder │◀───────────────┼──── Origin
//!                         │  │ 200/500  │    │ (rewrite) │                │
//!                         │  └──────────┘    └───────────┘                │
//!                         └───────────────────────────────────────────────┘
//! ```
//!
//! Configuration: `REV_PROXY_PORT`, `ORIGIN_URL`, optional `PROXY_CONFIG`
//! (TOML) and `RUST_LOG`.

use origin_proxy::config::{self, ObservabilityConfig};
use origin_proxy::lifecycle::{startup, Shutdown, StartupError};
use origin_proxy::observability::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::load_from_env();

    // Log with defaults if the configuration itself is what failed.
    let observability = config
        .as_ref()
        .map(|c| c.observability.clone())
        .unwrap_or_else(|_| ObservabilityConfig::default());
    logging::init_logging(&observability);

    tracing::info!("origin-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    let shutdown = Shutdown::new();
    tokio::spawn(shutdown.clone().trigger_on_signal());

    let result = match config {
        Ok(config) => startup::run(config, &shutdown).await,
        Err(e) => Err(StartupError::from(e)),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "Fatal error");
        return Err(e.into());
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
