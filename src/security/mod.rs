//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → rate_limit.rs (shared token bucket, admit or 429)
//!     → Pass to the forwarder
//! ```

pub mod rate_limit;

pub use rate_limit::RateLimiter;
