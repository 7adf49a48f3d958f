//! HTTP transport seam.
//!
//! The fetcher only needs "send a request, get a status, headers of interest
//! and a body back". [`HttpTransport`] does that with `reqwest`; tests plug
//! in scripted transports instead.

use std::future::Future;

use reqwest::Url;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, RETRY_AFTER, USER_AGENT};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{ConfigError, FetchError, Result, TransportError};

/// User agent string for API requests.
const USER_AGENT_VALUE: &str = concat!("patient-triage/", env!("CARGO_PKG_VERSION"));

/// Header carrying the API credential.
pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A request the fetcher can send (and resend) any number of times.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    pub body: Option<Value>,
}

impl ApiRequest {
    #[must_use]
    pub fn get(url: Url) -> Self {
        Self {
            method: Method::Get,
            url,
            body: None,
        }
    }

    #[must_use]
    pub fn post_json(url: Url, body: Value) -> Self {
        Self {
            method: Method::Post,
            url,
            body: Some(body),
        }
    }
}

/// The parts of an HTTP response the fetcher looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    /// Raw `Retry-After` header value, if any.
    pub retry_after: Option<String>,
    pub body: String,
}

impl ApiResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request, with no retry of its own.
pub trait Transport {
    fn send(
        &self,
        request: &ApiRequest,
    ) -> impl Future<Output = std::result::Result<ApiResponse, TransportError>> + Send;
}

/// `reqwest`-backed transport that authenticates every request.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a client with the API key and timeout from `config`.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        let mut key = HeaderValue::from_str(config.api_key())
            .map_err(|_| FetchError::Config(ConfigError::InvalidApiKey))?;
        key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| FetchError::Client(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn send(
        &self,
        request: &ApiRequest,
    ) -> impl Future<Output = std::result::Result<ApiResponse, TransportError>> + Send {
        let builder = match request.method {
            Method::Get => self.client.get(request.url.clone()),
            Method::Post => self.client.post(request.url.clone()),
        };
        let builder = match &request.body {
            Some(body) => builder.json(body),
            None => builder,
        };

        async move {
            let response = builder.send().await?;
            let status = response.status().as_u16();
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);
            let body = response.text().await?;

            Ok(ApiResponse {
                status,
                retry_after,
                body,
            })
        }
    }
}
