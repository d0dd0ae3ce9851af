//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the shared admission gate and forwarder once
//! - Create the Axum router sending every method and path to the proxy handler
//! - Wire up request tracing
//! - Serve until the shutdown coordinator fires

use std::sync::Arc;

use axum::{routing::any, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::{ProxyConfig, ValidationError};
use crate::http::forward::Forwarder;
use crate::http::origin::OriginTarget;
use crate::http::proxy::proxy_handler;
use crate::security::RateLimiter;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub limiter: Arc<RateLimiter>,
    pub forwarder: Forwarder,
}

/// HTTP server for the proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
    origin: Arc<OriginTarget>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// Fails only if the origin URL cannot be turned into an origin target.
    pub fn new(config: ProxyConfig) -> Result<Self, ValidationError> {
        let origin = Arc::new(OriginTarget::parse(&config.origin.url)?);

        let state = AppState {
            limiter: Arc::new(RateLimiter::from_config(&config.rate_limit)),
            forwarder: Forwarder::new(origin.clone(), config.relay.status_policy),
        };

        Ok(Self {
            router: build_router(state),
            config,
            origin,
        })
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Returns once `shutdown` fires (or its sender is gone) and in-flight
    /// requests have drained.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            origin = %self.origin,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown requested, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    pub fn origin(&self) -> &OriginTarget {
        &self.origin
    }

    /// The router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Build the Axum router with all middleware layers.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", any(proxy_handler))
        .route("/{*path}", any(proxy_handler))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}
