//! Structured logging.
//!
//! `RUST_LOG` takes precedence over the configured level. Pretty output for
//! terminals, JSON lines for log shippers.

use axum::http::{Method, Uri};
use chrono::{SecondsFormat, Utc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use crate::config::{LogFormat, ObservabilityConfig};

/// Install the global subscriber. Later calls are ignored.
pub fn init_logging(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "origin_proxy={level},tower_http={level}",
            level = config.log_level
        )
        .into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.log_format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
    };

    if result.is_err() {
        tracing::debug!("Global subscriber already installed");
    }
}

/// Emit the arrival event for an admitted request.
pub fn log_arrival(request_id: &Uuid, method: &Method, uri: &Uri) {
    let received_at = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
    tracing::info!(
        request_id = %request_id,
        received_at = %received_at,
        method = %method,
        path = %uri.path(),
        "Received request"
    );
}
