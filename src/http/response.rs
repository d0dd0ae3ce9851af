//! Responses written back to the caller.
//!
//! # Responsibilities
//! - 429 when the admission gate says no
//! - 500 carrying the dispatch error's text
//! - Relay the upstream body as a stream, never buffered
//!
//! Upstream headers are not relayed. The status is 200 unless the relay
//! policy asks for the upstream's own code.

use std::error::Error;

use axum::{
    body::Body,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::config::StatusPolicy;

/// Admission denied.
pub fn too_many_requests() -> Response {
    let status = StatusCode::TOO_MANY_REQUESTS;
    (status, status.canonical_reason().unwrap_or("Too Many Requests")).into_response()
}

/// Dispatch failed; the body is the error and its causes.
pub fn dispatch_failure(error: &(dyn Error + 'static)) -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, error_chain(error)).into_response()
}

/// Wrap an upstream response for the caller.
///
/// The body is moved, not copied: it streams to the caller as it arrives and
/// the upstream connection is released whenever the body is dropped.
pub fn relay(upstream: Response<Body>, policy: StatusPolicy) -> Response {
    let status = match policy {
        StatusPolicy::Fixed => StatusCode::OK,
        StatusPolicy::Propagate => upstream.status(),
    };

    let mut response = Response::new(upstream.into_body());
    *response.status_mut() = status;
    response
}

/// Render `error` followed by each of its sources, `": "`-separated.
pub fn error_chain(error: &(dyn Error + 'static)) -> String {
    let mut text = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        // Some wrappers already print their source.
        if !text.ends_with(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}
