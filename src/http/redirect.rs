//! Following upstream redirects.
//!
//! The origin's 3xx answers are chased so the caller sees the final page:
//! - 301, 302, 303: re-issued as GET (HEAD stays HEAD) without a body
//! - 307, 308: re-issued unchanged, but only when the request carried no body
//! - any other status, or a missing `Location`: the response is final
//!
//! At most [`MAX_REDIRECTS`] hops are followed per request.

use axum::{
    body::{Body, HttpBody},
    http::{
        header::{self, HeaderMap, HeaderName, HeaderValue},
        Method, Request, StatusCode, Uri, Version,
    },
};
use thiserror::Error;
use url::Url;

/// Hops followed before the dispatch is abandoned.
pub const MAX_REDIRECTS: usize = 10;

/// Dropped along with the body when the method changes.
const BODY_HEADERS: [HeaderName; 3] = [
    header::CONTENT_LENGTH,
    header::CONTENT_TYPE,
    header::TRANSFER_ENCODING,
];

/// Never sent to a different host than the one they were meant for.
const CREDENTIAL_HEADERS: [HeaderName; 3] = [
    header::AUTHORIZATION,
    header::PROXY_AUTHORIZATION,
    header::COOKIE,
];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RedirectError {
    #[error("stopped after {0} redirects")]
    TooMany(usize),

    #[error("invalid redirect location '{location}': {reason}")]
    Location { location: String, reason: String },
}

/// Everything needed to re-issue a request at a new location.
#[derive(Debug, Clone)]
pub struct Hop {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    has_body: bool,
}

impl Hop {
    /// Snapshot of an outbound request before it is sent.
    pub fn of<B: HttpBody>(request: &Request<B>) -> Self {
        Self {
            method: request.method().clone(),
            uri: request.uri().clone(),
            headers: request.headers().clone(),
            has_body: !request.body().is_end_stream(),
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The request to send next for a response answered with `status` and
    /// `location`, or `None` when that response is the one to relay.
    pub fn follow(
        &self,
        status: StatusCode,
        location: Option<&HeaderValue>,
    ) -> Result<Option<Hop>, RedirectError> {
        let keep_method = match status {
            StatusCode::MOVED_PERMANENTLY | StatusCode::FOUND | StatusCode::SEE_OTHER => false,
            // The inbound body has already been consumed.
            StatusCode::TEMPORARY_REDIRECT | StatusCode::PERMANENT_REDIRECT if !self.has_body => true,
            _ => return Ok(None),
        };
        let Some(location) = location else {
            return Ok(None);
        };

        let uri = self.resolve(location)?;
        let mut next = self.clone();

        if !keep_method {
            if next.method != Method::HEAD {
                next.method = Method::GET;
            }
            next.has_body = false;
            for name in BODY_HEADERS {
                next.headers.remove(name);
            }
        }

        if uri.host() != self.uri.host() {
            for name in CREDENTIAL_HEADERS {
                next.headers.remove(name);
            }
        }

        if let Some(host) = uri
            .authority()
            .and_then(|authority| HeaderValue::from_str(authority.as_str()).ok())
        {
            next.headers.insert(header::HOST, host);
        }

        next.uri = uri;
        Ok(Some(next))
    }

    /// A fresh request for this hop. It never has a body.
    pub fn to_request(&self) -> Request<Body> {
        let mut request = Request::new(Body::empty());
        *request.method_mut() = self.method.clone();
        *request.uri_mut() = self.uri.clone();
        *request.version_mut() = Version::HTTP_11;
        *request.headers_mut() = self.headers.clone();
        request
    }

    /// Resolve `location` against the current URI.
    fn resolve(&self, location: &HeaderValue) -> Result<Uri, RedirectError> {
        let invalid = |reason: String| RedirectError::Location {
            location: String::from_utf8_lossy(location.as_bytes()).into_owned(),
            reason,
        };

        let raw = location.to_str().map_err(|e| invalid(e.to_string()))?;
        let base = Url::parse(&self.uri.to_string()).map_err(|e| invalid(e.to_string()))?;
        let mut target = base.join(raw).map_err(|e| invalid(e.to_string()))?;

        if !matches!(target.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", target.scheme())));
        }
        target.set_fragment(None);
        // Only fails for URLs without a host, which http(s) never are.
        let _ = target.set_username("");
        let _ = target.set_password(None);

        target
            .as_str()
            .parse::<Uri>()
            .map_err(|e| invalid(e.to_string()))
    }
}
