//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults
//!     → optional TOML file named by PROXY_CONFIG (loader.rs)
//!     → REV_PROXY_PORT / ORIGIN_URL overrides (loader.rs)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//! ```
//!
//! Any failure here is fatal to startup; no request has been served yet.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_from_env, ConfigError};
pub use schema::{
    ListenerConfig, LogFormat, ObservabilityConfig, OriginConfig, ProxyConfig, RateLimitConfig,
    RelayConfig, StatusPolicy,
};
pub use validation::ValidationError;
