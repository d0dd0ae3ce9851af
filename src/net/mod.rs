//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! ListenerConfig
//!     → listener.rs (bind, fatal on failure)
//!     → Hand off to the HTTP layer (axum::serve)
//! ```

pub mod listener;

pub use listener::{bind, ListenerError};
