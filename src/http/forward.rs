//! Forwarding an admitted request to the origin.
//!
//! # Steps
//! 1. Rewrite: Host header, URI scheme and URI authority point at the origin
//! 2. Dispatch: one attempt on the shared client, no retries; upstream
//!    redirects are followed (see `redirect.rs`)
//! 3. Relay: stream the upstream body back (see `response.rs`)
//!
//! A dispatch failure becomes a 500 carrying the error text.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{
        header::{HOST, LOCATION},
        uri::PathAndQuery,
        Request, Uri, Version,
    },
    response::Response,
};
use hyper::body::Incoming;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use thiserror::Error;

use crate::config::StatusPolicy;
use crate::http::origin::OriginTarget;
use crate::http::redirect::{Hop, RedirectError, MAX_REDIRECTS};
use crate::http::response;
use crate::observability::metrics;

/// Client shared by every request; reuses connections per origin.
pub type UpstreamClient = Client<HttpsConnector<HttpConnector>, Body>;

/// Errors from sending a request upstream.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("upstream request failed: {0}")]
    Dispatch(#[from] hyper_util::client::legacy::Error),

    #[error("upstream redirect failed: {0}")]
    Redirect(#[from] RedirectError),
}

/// Build the upstream client. Speaks plain HTTP or HTTPS depending on the
/// origin URI's scheme.
pub fn build_client() -> UpstreamClient {
    let connector = HttpsConnectorBuilder::new()
        .with_webpki_roots()
        .https_or_http()
        .enable_http1()
        .build();

    Client::builder(TokioExecutor::new()).build(connector)
}

/// Point `request` at `origin`.
///
/// Consumes the inbound request and returns the outbound one. Path, query,
/// method, headers and body are untouched. The outbound version is HTTP/1.1
/// so the client rebuilds the request line from the new URI. Applying it
/// twice gives the same result as applying it once.
pub fn rewrite_request<B>(request: Request<B>, origin: &OriginTarget) -> Request<B> {
    let (mut parts, body) = request.into_parts();

    let inbound = std::mem::take(&mut parts.uri);
    let mut uri_parts = inbound.clone().into_parts();
    uri_parts.scheme = Some(origin.scheme().clone());
    uri_parts.authority = Some(origin.authority().clone());
    if uri_parts.path_and_query.is_none() {
        uri_parts.path_and_query = Some(PathAndQuery::from_static("/"));
    }

    // Scheme, authority and path are all set, which is all `from_parts` checks.
    parts.uri = Uri::from_parts(uri_parts).unwrap_or_else(|e| {
        tracing::warn!(uri = %inbound, error = %e, "Could not retarget request URI");
        inbound
    });
    parts.version = Version::HTTP_11;
    parts.headers.insert(HOST, origin.host_header().clone());

    Request::from_parts(parts, body)
}

/// Rewrites, dispatches and relays requests for one origin.
#[derive(Clone)]
pub struct Forwarder {
    client: UpstreamClient,
    origin: Arc<OriginTarget>,
    status_policy: StatusPolicy,
}

impl Forwarder {
    pub fn new(origin: Arc<OriginTarget>, status_policy: StatusPolicy) -> Self {
        Self::with_client(build_client(), origin, status_policy)
    }

    pub fn with_client(
        client: UpstreamClient,
        origin: Arc<OriginTarget>,
        status_policy: StatusPolicy,
    ) -> Self {
        Self {
            client,
            origin,
            status_policy,
        }
    }

    pub fn origin(&self) -> &OriginTarget {
        &self.origin
    }

    pub fn status_policy(&self) -> StatusPolicy {
        self.status_policy
    }

    /// Rewrite and send `request`, returning the final upstream response
    /// unread. Redirects are followed up to [`MAX_REDIRECTS`] hops.
    pub async fn dispatch(&self, request: Request<Body>) -> Result<Response<Incoming>, ForwardError> {
        let outbound = rewrite_request(request, &self.origin);
        let mut hop = Hop::of(&outbound);

        tracing::trace!(uri = %outbound.uri(), "Dispatching to origin");
        let mut upstream = self.client.request(outbound).await?;

        let mut followed = 0;
        loop {
            let next = match hop.follow(upstream.status(), upstream.headers().get(LOCATION))? {
                Some(next) => next,
                None => return Ok(upstream),
            };
            if followed == MAX_REDIRECTS {
                return Err(RedirectError::TooMany(MAX_REDIRECTS).into());
            }
            followed += 1;

            tracing::debug!(
                status = %upstream.status(),
                location = %next.uri(),
                hop = followed,
                "Following upstream redirect"
            );
            upstream = self.client.request(next.to_request()).await?;
            hop = next;
        }
    }

    /// Full pipeline: the caller's response for an admitted request.
    pub async fn forward(&self, request: Request<Body>) -> Response {
        match self.dispatch(request).await {
            Ok(upstream) => {
                tracing::debug!(upstream_status = %upstream.status(), "Relaying upstream response");
                response::relay(upstream.map(Body::new), self.status_policy)
            }
            Err(e) => {
                tracing::warn!(origin = %self.origin, error = %e, "Upstream request failed");
                metrics::record_upstream_error();
                response::dispatch_failure(&e)
            }
        }
    }
}
