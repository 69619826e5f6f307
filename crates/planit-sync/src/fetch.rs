//! HTTP seam for dataset downloads.
//!
//! The sync engine only sees [`Fetcher`]. [`HttpFetcher`] is the reqwest
//! implementation used in production; tests substitute scripted fetchers.

use std::time::Duration;

use async_trait::async_trait;
use planit_config::RemoteConfig;
use reqwest::header::{ETAG, LAST_MODIFIED};

use crate::error::SyncError;

/// A GET request with optional extra headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
}

impl FetchRequest {
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
        }
    }

    #[must_use]
    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// Value of the first header named `name`, ignoring ASCII case.
    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// The parts of a response the sync engine reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub etag: Option<String>,
    pub last_modified: Option<String>,
    pub body: String,
}

impl FetchResponse {
    /// A 200 response carrying `body`.
    #[must_use]
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            ..Self::default()
        }
    }

    /// A bodiless response with `status`.
    #[must_use]
    pub fn status(status: u16) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_etag(mut self, etag: impl Into<String>) -> Self {
        self.etag = Some(etag.into());
        self
    }

    #[must_use]
    pub fn with_last_modified(mut self, value: impl Into<String>) -> Self {
        self.last_modified = Some(value.into());
        self
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    #[must_use]
    pub const fn is_not_modified(&self) -> bool {
        self.status == 304
    }
}

/// Performs GET requests on behalf of the sync engine.
///
/// Implementations return every HTTP status as a [`FetchResponse`]; only
/// connection-level failures are errors.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, SyncError>;
}

/// reqwest-backed [`Fetcher`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http: reqwest::Client,
}

impl HttpFetcher {
    /// Build a client with the configured user agent and timeout.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Transport`] if the client cannot be built.
    pub fn new(remote: &RemoteConfig) -> Result<Self, SyncError> {
        let http = reqwest::Client::builder()
            .user_agent(remote.user_agent.as_str())
            .timeout(Duration::from_secs(remote.timeout_secs))
            .build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, SyncError> {
        let mut builder = self.http.get(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(*name, value.as_str());
        }
        let response = builder.send().await?;
        into_fetch_response(response).await
    }
}

/// Keep the status and the caching headers, then read the body.
async fn into_fetch_response(response: reqwest::Response) -> Result<FetchResponse, SyncError> {
    let header = |name: reqwest::header::HeaderName| {
        response
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(String::from)
    };
    let status = response.status().as_u16();
    let etag = header(ETAG);
    let last_modified = header(LAST_MODIFIED);
    let body = response.text().await?;
    Ok(FetchResponse {
        status,
        etag,
        last_modified,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn mock_response(status: u16, etag: Option<&str>, body: &'static str) -> reqwest::Response {
        let mut builder = ::http::Response::builder().status(status);
        if let Some(etag) = etag {
            builder = builder.header("ETag", etag);
        }
        reqwest::Response::from(builder.body(body).unwrap())
    }

    #[tokio::test]
    async fn keeps_status_headers_and_body() {
        let response = into_fetch_response(mock_response(200, Some("\"v2\""), "{}"))
            .await
            .unwrap();
        assert_eq!(response, FetchResponse::ok("{}").with_etag("\"v2\""));
    }

    #[tokio::test]
    async fn empty_etag_is_dropped() {
        let response = into_fetch_response(mock_response(304, Some(""), ""))
            .await
            .unwrap();
        assert!(response.is_not_modified());
        assert_eq!(response.etag, None);
    }

    #[test]
    fn header_lookup_ignores_case() {
        let request = FetchRequest::get("https://example.test").header("If-None-Match", "\"v1\"");
        assert_eq!(request.header_value("if-none-match"), Some("\"v1\""));
        assert_eq!(request.header_value("If-Modified-Since"), None);
    }
}
