//! Transport layer.
//!
//! A [`Transport`] performs exactly one authenticated HTTP round trip and
//! classifies the outcome. Scopes hold one behind an `Arc`, so tests can
//! swap in their own implementation at construction time.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method};

use crate::error::{classify_failure, PteroError, Result};

/// Media type the panel expects in the `Accept` header.
pub const ACCEPT_MEDIA_TYPE: &str = "application/vnd.pterodactyl.v1+json";

const USER_AGENT: &str = concat!("pteroapi/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// A fully-formed request: absolute URL, method and optional JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub url: String,
    pub method: Method,
    pub body: Option<Vec<u8>>,
}

impl Request {
    /// A bodyless GET against an absolute URL.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: Method::GET,
            body: None,
        }
    }
}

/// Returns true for the statuses the panel uses to signal success.
///
/// The accepted range is 200 to 226 inclusive.
pub fn is_success(status: u16) -> bool {
    (200..=226).contains(&status)
}

/// Issues one authenticated request and returns the raw response body.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform a single round trip.
    ///
    /// On success the whole body is returned, possibly empty. Any status
    /// outside 200..=226 is turned into an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent, the body cannot be
    /// read, or the panel answers with a non-success status.
    async fn dispatch(&self, token: &str, request: Request) -> Result<Vec<u8>>;
}

/// [`Transport`] backed by a `reqwest` client.
///
/// This struct is cheaply cloneable; clones share the same connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    /// Build a transport with the crate's default client settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Build a transport whose requests give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(timeout)
            .build()
            .map_err(PteroError::HttpError)?;

        Ok(Self { http })
    }

    /// Wrap an already configured client.
    pub fn from_client(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[tracing::instrument(skip(self, token, request), fields(method = %request.method, url = %request.url))]
    async fn dispatch(&self, token: &str, request: Request) -> Result<Vec<u8>> {
        let mut builder = self
            .http
            .request(request.method, &request.url)
            .bearer_auth(token)
            .header(ACCEPT, ACCEPT_MEDIA_TYPE)
            .header(CONTENT_TYPE, "application/json");

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(PteroError::HttpError)?;
        let status = response.status();

        // Reading to the end releases the connection back to the pool.
        let body = response.bytes().await.map_err(PteroError::BodyError)?;

        if is_success(status.as_u16()) {
            return Ok(body.to_vec());
        }

        let err = classify_failure(status, &body);
        tracing::warn!(status = status.as_u16(), error = %err, "request rejected");
        Err(err)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range_boundaries() {
        assert!(!is_success(199));
        assert!(is_success(200));
        assert!(is_success(204));
        assert!(is_success(226));
        assert!(!is_success(227));
        assert!(!is_success(404));
    }

    #[test]
    fn test_request_get_has_no_body() {
        let request = Request::get("https://panel.example.com/api/client");
        assert_eq!(request.method, Method::GET);
        assert!(request.body.is_none());
    }

    #[test]
    fn test_http_transport_builds() {
        tokio_test::assert_ok!(HttpTransport::new());
    }
}
