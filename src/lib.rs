//! Rate-limited forwarding proxy library.
//!
//! Every inbound request passes a shared token-bucket admission gate and, if
//! admitted, is rewritten to a single fixed origin and relayed back.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod security;

pub use config::schema::ProxyConfig;
pub use http::{HttpServer, OriginTarget};
pub use lifecycle::Shutdown;
pub use security::RateLimiter;
