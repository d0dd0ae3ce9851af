//! Configuration validation.
//!
//! Semantic checks run after deserialization and env overrides. Every
//! problem is collected so a bad deployment reports all of them at once.

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("invalid bind address '{0}'")]
    BindAddress(String),

    #[error("invalid origin URL '{url}': {reason}")]
    OriginUrl { url: String, reason: String },

    #[error("origin URL '{0}' has no host")]
    OriginHost(String),

    #[error("unsupported origin scheme '{0}' (expected http or https)")]
    OriginScheme(String),

    #[error("rate_limit.requests_per_second must be a positive number, got {0}")]
    RefillRate(f64),

    #[error("rate_limit.burst_size must be at least 1")]
    BurstSize,

    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),
}

/// Validate the configuration, returning every error found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if let Err(e) = validate_origin_url(&config.origin.url) {
        errors.push(e);
    }

    let rps = config.rate_limit.requests_per_second;
    if !rps.is_finite() || rps <= 0.0 {
        errors.push(ValidationError::RefillRate(rps));
    }
    if config.rate_limit.burst_size == 0 {
        errors.push(ValidationError::BurstSize);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check that `raw` is an absolute http(s) URL with a host.
pub fn validate_origin_url(raw: &str) -> Result<Url, ValidationError> {
    let url = Url::parse(raw).map_err(|e| ValidationError::OriginUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(ValidationError::OriginScheme(other.to_string())),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(ValidationError::OriginHost(raw.to_string())),
    }
}
