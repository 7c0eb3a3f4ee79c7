use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::error::{AttemptError, ConfigError};
use crate::http;

/// Performs one `GET` against a ping target.
///
/// Implementations return the response status; deciding what counts as
/// success and whether to retry is left to [`HeartbeatClient`](crate::HeartbeatClient).
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url, timeout: Duration) -> Result<u16, AttemptError>;
}

/// [`Transport`] backed by `reqwest` over rustls.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self {
            client: http::client()?,
        })
    }

    /// Reuse an existing client (its user agent and TLS setup are kept).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &Url, timeout: Duration) -> Result<u16, AttemptError> {
        let response = self
            .client
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AttemptError::Timeout(timeout)
                } else {
                    // Drop the URL: it carries the job's token.
                    AttemptError::Transport(e.without_url().to_string())
                }
            })?;
        Ok(response.status().as_u16())
    }
}
