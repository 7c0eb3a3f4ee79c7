//! Job-bound heartbeats: ping after a job, or wrap the job so the ping
//! fires only when it succeeds.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::client::{HeartbeatClient, HeartbeatRequest, Outcome};
use crate::constants::{DEFAULT_BACKOFF_UNIT, DEFAULT_BASE_URL, DEFAULT_MAX_ATTEMPTS, DEFAULT_TIMEOUT};
use crate::error::ConfigError;
use crate::policy::RetryPolicy;
use crate::target::{parse_target, ping_url};

/// A heartbeat client bound to one monitored job.
#[derive(Debug, Clone)]
pub struct Monitor {
    client: HeartbeatClient,
    request: HeartbeatRequest,
}

impl Monitor {
    /// Monitor for `token` on the hosted service with the default policy.
    pub fn new(token: &str) -> Result<Self, ConfigError> {
        Self::builder().token(token).build()
    }

    pub fn builder() -> MonitorBuilder {
        MonitorBuilder::default()
    }

    pub fn request(&self) -> &HeartbeatRequest {
        &self.request
    }

    /// Send the success heartbeat now.
    pub async fn ping(&self) -> Outcome {
        self.client.send(&self.request).await
    }

    /// Run `job`; ping only if it returns `Ok`.
    ///
    /// A job error is returned unchanged and suppresses the ping. The
    /// heartbeat outcome never affects the returned value.
    pub async fn wrap<F, Fut, T, E>(&self, job: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let value = job().await?;
        debug!("job completed, sending heartbeat");
        self.ping().await;
        Ok(value)
    }
}

/// Builder for [`Monitor`]. Either a token or an explicit target is
/// required; an explicit target wins over token and base URL.
#[derive(Debug, Clone)]
pub struct MonitorBuilder {
    token: Option<String>,
    target: Option<String>,
    base_url: String,
    max_attempts: u32,
    timeout: Duration,
    backoff_unit: Duration,
    client: Option<HeartbeatClient>,
}

impl Default for MonitorBuilder {
    fn default() -> Self {
        Self {
            token: None,
            target: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            timeout: DEFAULT_TIMEOUT,
            backoff_unit: DEFAULT_BACKOFF_UNIT,
            client: None,
        }
    }
}

impl MonitorBuilder {
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Full ping URL, bypassing token and base URL.
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn backoff_unit(mut self, backoff_unit: Duration) -> Self {
        self.backoff_unit = backoff_unit;
        self
    }

    /// Use `client` instead of a fresh HTTPS client.
    pub fn client(mut self, client: HeartbeatClient) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> Result<Monitor, ConfigError> {
        let target = match (&self.target, &self.token) {
            (Some(target), _) => parse_target(target)?,
            (None, Some(token)) => ping_url(&self.base_url, token)?,
            (None, None) => return Err(ConfigError::EmptyTarget),
        };
        let policy = RetryPolicy::new(self.max_attempts, self.timeout, self.backoff_unit)?;
        let client = match self.client {
            Some(client) => client,
            None => HeartbeatClient::new()?,
        };
        Ok(Monitor {
            client,
            request: HeartbeatRequest::new(target, policy),
        })
    }
}

/// One-shot ping for `token` on the hosted service, each attempt bounded by
/// `timeout`.
///
/// Only a malformed token or a zero timeout is an error; delivery failures
/// are reported in the returned [`Outcome`].
pub async fn ping(token: &str, timeout: Duration) -> Result<Outcome, ConfigError> {
    let monitor = Monitor::builder().token(token).timeout(timeout).build()?;
    Ok(monitor.ping().await)
}
