//! The authenticated transport every outbound request goes through.

use crate::config::{QueryConfig, ServiceOptions};
use crate::error::FetchError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use std::fmt;

/// A single outbound HTTP request.
#[derive(Clone, Debug)]
pub struct FetchRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

impl FetchRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: &'static str) -> Self {
        self.headers.insert(name, HeaderValue::from_static(value));
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// The response to a [`FetchRequest`], fully read.
#[derive(Clone, Debug)]
pub struct FetchResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: String,
}

impl FetchResponse {
    pub fn new(status: StatusCode, content_type: Option<&str>, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: content_type.map(ToOwned::to_owned),
            body: body.into(),
        }
    }

    /// The media type of the body, without parameters and lowercased.
    pub fn media_type(&self) -> Option<String> {
        self.content_type
            .as_deref()
            .and_then(|value| value.split(';').next())
            .map(|media_type| media_type.trim().to_ascii_lowercase())
            .filter(|media_type| !media_type.is_empty())
    }

    /// Turns a non-success status into a [`FetchError`] carrying the raw status and body.
    pub fn error_for_status(self, url: &str) -> Result<Self, FetchError> {
        if self.status.is_success() {
            Ok(self)
        } else {
            Err(FetchError::status(url, self.status, self.body))
        }
    }
}

/// Fetches resources under the identity of a Pod session.
///
/// Implementations must be usable from several in-flight queries at once.
#[async_trait]
pub trait AuthenticatedFetch: Send + Sync {
    /// Sends `request` and reads the whole response. Non-success statuses are returned as
    /// responses, only transport failures are errors.
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, FetchError>;
}

/// The default [`AuthenticatedFetch`] backed by [`reqwest`].
///
/// Attaches the session's access token as a bearer token when one is configured.
#[derive(Clone)]
pub struct HttpFetch {
    client: reqwest::Client,
    access_token: Option<String>,
}

impl HttpFetch {
    pub fn new(config: &QueryConfig, options: &ServiceOptions) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|error| FetchError::transport(config.pod_url(), error))?;
        Ok(Self {
            client,
            access_token: config.credentials().access_token.clone(),
        })
    }
}

impl fmt::Debug for HttpFetch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpFetch")
            .field("authenticated", &self.access_token.is_some())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl AuthenticatedFetch for HttpFetch {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, FetchError> {
        let FetchRequest {
            method,
            url,
            headers,
            body,
        } = request;
        let mut builder = self.client.request(method, &url).headers(headers);
        if let Some(token) = &self.access_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }
        let response = builder
            .send()
            .await
            .map_err(|error| FetchError::transport(&url, error))?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(ToOwned::to_owned);
        let body = response
            .text()
            .await
            .map_err(|error| FetchError::transport(&url, error))?;
        Ok(FetchResponse {
            status,
            content_type,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_type_drops_parameters() {
        let response = FetchResponse::new(
            StatusCode::OK,
            Some("Text/Turtle; charset=utf-8"),
            String::new(),
        );
        assert_eq!(response.media_type().as_deref(), Some("text/turtle"));
    }

    #[test]
    fn error_for_status_keeps_status_and_body() {
        let error = FetchResponse::new(StatusCode::FORBIDDEN, None, "no access")
            .error_for_status("https://pod.example/private.ttl")
            .unwrap_err();
        assert_eq!(error.url(), "https://pod.example/private.ttl");
        assert_eq!(error.status_code(), Some(StatusCode::FORBIDDEN));
        assert_eq!(error.body(), Some("no access"));
    }
}
