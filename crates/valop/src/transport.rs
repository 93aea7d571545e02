//! Outbound HTTP seam.
//!
//! The dispatcher only needs "POST these bytes to this path, give me the
//! body back". [`HttpTransport`] does that with reqwest; tests substitute
//! their own [`Transport`].

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use valconf::ClientConfig;

use crate::error::TransportError;

/// Issues a POST and returns the raw response body.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST a JSON `body` to `path`, relative to the transport's base URL.
    ///
    /// Non-success statuses are errors.
    async fn post(&self, path: &str, body: Bytes) -> Result<Bytes, TransportError>;
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: String,
    client: Client,
    timeout: Option<Duration>,
}

impl HttpTransport {
    /// Transport for `base_url` with no request timeout.
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Transport reusing an existing reqwest client (connection pool,
    /// proxies, TLS settings).
    pub fn with_client(base_url: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout: None,
        }
    }

    /// Transport for a loaded `[client]` section. A zero timeout means none.
    pub fn from_config(config: &ClientConfig) -> Self {
        let transport = Self::new(&config.base_url);
        match config.timeout_ms.filter(|ms| *ms > 0) {
            Some(ms) => transport.with_timeout(Duration::from_millis(ms)),
            None => transport,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for `path`, with exactly one slash at the join.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, path: &str, body: Bytes) -> Result<Bytes, TransportError> {
        let url = self.url_for(path);

        let mut req_builder = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body);

        if let Some(timeout) = self.timeout {
            req_builder = req_builder.timeout(timeout);
        }

        let response = req_builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Http {
                status: status.as_u16(),
                body: error_body(response.text().await),
            });
        }

        tracing::trace!(url = %url, status = status.as_u16(), "response received");

        Ok(response.bytes().await?)
    }
}

/// Body text of an error response, or why it could not be read.
fn error_body<E: fmt::Display>(read: Result<String, E>) -> String {
    match read {
        Ok(body) => body,
        Err(e) => format!("<failed to read response body: {}>", e),
    }
}
