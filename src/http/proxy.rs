//! Per-request composition: admission gate, then forwarder.
//!
//! ```text
//! Received ──gate denies──▶ Rejected (429)
//!    │
//!    └─gate admits─▶ Admitted ──forward──▶ Completed (200 relay | 500)
//! ```

use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

use crate::http::response;
use crate::http::server::AppState;
use crate::observability::{logging, metrics};

/// Handler for every method and path.
pub async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    if !state.limiter.try_admit() {
        metrics::record_rate_limited();
        return response::too_many_requests();
    }

    let start = Instant::now();
    let request_id = Uuid::new_v4();
    let method = request.method().clone();

    logging::log_arrival(&request_id, &method, request.uri());

    let span = tracing::info_span!("proxy", request_id = %request_id);
    let response = state.forwarder.forward(request).instrument(span.clone()).await;

    span.in_scope(|| {
        tracing::debug!(
            status = response.status().as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Request completed"
        );
    });
    metrics::record_request(method.as_str(), response.status().as_u16(), start);
    response
}
