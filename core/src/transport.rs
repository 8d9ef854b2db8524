//! Async transport seam and the reqwest-backed default.
//!
//! # Design
//! The orchestrator only ever sees `Result<RawResponse, TransportError>`,
//! so anything that can perform an HTTP round-trip can sit behind this
//! trait. The default `HttpTransport` wraps a shared `reqwest::Client` and
//! applies the crate's non-2xx policy: error statuses are transport
//! failures carrying the response body.

use async_trait::async_trait;

use crate::error::TransportError;
use crate::http::{HttpMethod, OutboundRequest, RawResponse};

/// Executes one outbound request asynchronously.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn issue(&self, request: &OutboundRequest) -> Result<RawResponse, TransportError>;
}

/// Default transport over a pooled `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a caller-configured client (timeouts, proxies, TLS).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

fn into_transport_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Network(e.to_string())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn issue(&self, request: &OutboundRequest) -> Result<RawResponse, TransportError> {
        let mut builder = self
            .client
            .request(reqwest_method(request.method), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(into_transport_error)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.text().await.map_err(into_transport_error)?;

        if !(200..300).contains(&status) {
            return Err(TransportError::Status { status, body });
        }
        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}
