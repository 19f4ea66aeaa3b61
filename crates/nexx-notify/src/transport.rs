//! Outbound transport for manage API calls
//!
//! The dispatcher builds an [`OutboundRequest`] and hands it to a
//! [`Transport`]. [`HttpTransport`] is the reqwest-backed implementation used
//! in production.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, ClientBuilder};
use tracing::debug;

use nexx_core::config::HttpConfig;
use nexx_core::{Error, Result};

/// A fully built manage API request: headers only, no body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl OutboundRequest {
    /// Look up a header value, ignoring case
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Raw response as received from the remote side
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Bytes,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a built request and returns whatever came back.
///
/// Implementations report connection problems as `Error::Transport` and
/// leave status interpretation to the caller.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, request: &OutboundRequest) -> Result<TransportResponse>;
}

/// reqwest-backed transport with bounded timeouts
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let mut builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(config.user_agent.as_str());

        if config.no_proxy {
            builder = builder.no_proxy();
        }

        let client = builder
            .build()
            .map_err(|e| Error::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, request: &OutboundRequest) -> Result<TransportResponse> {
        let headers = header_map(&request.headers)?;

        let response = self
            .client
            .post(&request.url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Transport(format!("Failed to read response body: {}", e)))?;

        debug!(url = %request.url, status, bytes = body.len(), "Received manage API response");

        Ok(TransportResponse { status, body })
    }
}

fn header_map(headers: &[(String, String)]) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());

    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| Error::Transport(format!("Invalid header name {:?}: {}", name, e)))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|e| Error::Transport(format!("Invalid value for header {}: {}", name, e)))?;
        map.append(header_name, header_value);
    }

    Ok(map)
}
