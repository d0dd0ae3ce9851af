//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, tracing layer)
//!     → proxy.rs (admission gate, arrival log)
//!     → forward.rs (rewrite to origin.rs target, dispatch, redirect.rs hops)
//!     → response.rs (429 / 500 / streamed relay)
//!     → Send to client
//! ```

pub mod forward;
pub mod origin;
pub mod proxy;
pub mod redirect;
pub mod response;
pub mod server;

pub use forward::{rewrite_request, ForwardError, Forwarder};
pub use origin::OriginTarget;
pub use server::{AppState, HttpServer};
