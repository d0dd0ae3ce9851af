//! The fixed upstream origin.

use std::fmt;
use std::str::FromStr;

use axum::http::uri::{Authority, Scheme};
use axum::http::HeaderValue;

use crate::config::validation::{validate_origin_url, ValidationError};

/// Scheme and host:port of the origin server.
///
/// Parsed once at startup and shared read-only by every request. The origin
/// URL's path, query and credentials are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginTarget {
    scheme: Scheme,
    authority: Authority,
    host_header: HeaderValue,
}

impl OriginTarget {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let url = validate_origin_url(raw)?;
        let bad_host = || ValidationError::OriginHost(raw.to_string());

        // url::Url keeps the brackets around IPv6 literals, as Authority wants.
        let host = url.host_str().ok_or_else(bad_host)?;
        let authority = match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };

        let authority = Authority::from_str(&authority).map_err(|_| bad_host())?;
        let host_header = HeaderValue::from_str(authority.as_str()).map_err(|_| bad_host())?;
        let scheme = if url.scheme() == "https" {
            Scheme::HTTPS
        } else {
            Scheme::HTTP
        };

        Ok(Self {
            scheme,
            authority,
            host_header,
        })
    }

    pub fn scheme(&self) -> &Scheme {
        &self.scheme
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// Value written into the outbound `Host` header.
    pub fn host_header(&self) -> &HeaderValue {
        &self.host_header
    }
}

impl FromStr for OriginTarget {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for OriginTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.authority)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scheme_and_authority() {
        let origin: OriginTarget = "http://origin.test:9000".parse().unwrap();
        assert_eq!(origin.scheme(), &Scheme::HTTP);
        assert_eq!(origin.authority().as_str(), "origin.test:9000");
        assert_eq!(origin.host_header(), "origin.test:9000");
        assert_eq!(origin.to_string(), "http://origin.test:9000");
    }

    #[test]
    fn ignores_path_query_and_userinfo() {
        let origin = OriginTarget::parse("https://user:pw@origin.test/api?x=1").unwrap();
        assert_eq!(origin.scheme(), &Scheme::HTTPS);
        assert_eq!(origin.authority().as_str(), "origin.test");
    }

    #[test]
    fn default_port_is_dropped() {
        let origin = OriginTarget::parse("https://origin.test:443").unwrap();
        assert_eq!(origin.authority().as_str(), "origin.test");
    }

    #[test]
    fn ipv6_literal() {
        let origin = OriginTarget::parse("http://[::1]:8081").unwrap();
        assert_eq!(origin.authority().as_str(), "[::1]:8081");
    }

    #[test]
    fn rejects_unusable_urls() {
        assert!(OriginTarget::parse("").is_err());
        assert!(OriginTarget::parse("mailto:someone@origin.test").is_err());
        assert!(OriginTarget::parse("http://").is_err());
    }
}
