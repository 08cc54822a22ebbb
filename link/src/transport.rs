//! HTTP transport used by the executor and the schema synchronizer.
//!
//! The default transport is backed by `reqwest`. Anything implementing
//! [`HttpTransport`] can be plugged into the client builder instead.

use crate::error::{DataProxyError, Result};
use crate::timeouts::DataProxyTimeouts;
use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue};
use std::collections::BTreeMap;
use std::time::Instant;

/// Request/response header map.
pub type Headers = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Put,
    Post,
}

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Headers,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Reject header names or values that cannot be put on the wire.
pub fn validate_headers(headers: &Headers) -> Result<()> {
    for (name, value) in headers {
        HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
            DataProxyError::Configuration(format!("Invalid header name: {:?}", name))
        })?;
        HeaderValue::from_str(value).map_err(|_| {
            DataProxyError::Configuration(format!("Invalid value for header {}", name))
        })?;
    }
    Ok(())
}

/// Sends one request and returns the raw response.
///
/// Implementations report connection-level failures as
/// [`DataProxyError::Network`](crate::DataProxyError::Network); any HTTP
/// status, including errors, is a successful send.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// `reqwest`-backed transport.
#[derive(Clone)]
pub struct ReqwestTransport {
    http_client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeouts: &DataProxyTimeouts) -> Result<Self> {
        // One request per logical call; no idle connections are kept.
        let http_client = reqwest::Client::builder()
            .timeout(timeouts.request_timeout)
            .connect_timeout(timeouts.connection_timeout)
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| DataProxyError::Configuration(e.to_string()))?;
        Ok(Self { http_client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = match request.method {
            HttpMethod::Put => self.http_client.put(&request.url),
            HttpMethod::Post => self.http_client.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let start = Instant::now();
        let response = builder.body(request.body).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        log::debug!(
            "[DATAPROXY_HTTP] {:?} {} status={} duration_ms={}",
            request.method,
            request.url,
            status,
            start.elapsed().as_millis()
        );

        Ok(HttpResponse { status, body })
    }
}
