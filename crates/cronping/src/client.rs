//! Heartbeat delivery: one `GET` per attempt, linear backoff between
//! attempts, never an error for the caller.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use url::Url;

use crate::constants::{DEFAULT_BACKOFF_UNIT, DEFAULT_MAX_ATTEMPTS, DEFAULT_TIMEOUT};
use crate::error::{AttemptError, ConfigError};
use crate::policy::RetryPolicy;
use crate::target::parse_target;
use crate::transport::{HttpTransport, Transport};

/// A validated heartbeat: where to send it and how hard to try.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeartbeatRequest {
    target: Url,
    policy: RetryPolicy,
}

impl HeartbeatRequest {
    /// `target` must already have passed [`parse_target`].
    pub(crate) fn new(target: Url, policy: RetryPolicy) -> Self {
        Self { target, policy }
    }

    pub fn builder(target: impl Into<String>) -> HeartbeatRequestBuilder {
        HeartbeatRequestBuilder {
            target: target.into(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            timeout: DEFAULT_TIMEOUT,
            backoff_unit: DEFAULT_BACKOFF_UNIT,
        }
    }

    pub fn target(&self) -> &Url {
        &self.target
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

#[derive(Debug, Clone)]
pub struct HeartbeatRequestBuilder {
    target: String,
    max_attempts: u32,
    timeout: Duration,
    backoff_unit: Duration,
}

impl HeartbeatRequestBuilder {
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

    pub fn build(self) -> Result<HeartbeatRequest, ConfigError> {
        let target = parse_target(&self.target)?;
        let policy = RetryPolicy::new(self.max_attempts, self.timeout, self.backoff_unit)?;
        Ok(HeartbeatRequest { target, policy })
    }
}

/// Result of [`HeartbeatClient::send`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The service answered 200 on attempt number `attempts`.
    Delivered { attempts: u32 },
    /// Every attempt failed; `reason` is the last failure.
    Undelivered { attempts: u32, reason: AttemptError },
}

impl Outcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }

    /// Number of requests made.
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Delivered { attempts } | Self::Undelivered { attempts, .. } => *attempts,
        }
    }
}

/// Sends heartbeats. Stateless between calls; clones share the transport.
#[derive(Clone)]
pub struct HeartbeatClient {
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for HeartbeatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeartbeatClient").finish_non_exhaustive()
    }
}

impl HeartbeatClient {
    /// Client over HTTPS with the default `reqwest` setup.
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self::with_transport(HttpTransport::new()?))
    }

    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// Deliver one heartbeat.
    ///
    /// Only HTTP 200 counts as delivered. Non-200 statuses, transport errors
    /// and timeouts are retried up to the policy's attempt budget, sleeping
    /// `backoff_unit * i` after failed attempt `i`. Exhaustion is logged at
    /// warn level and reported as [`Outcome::Undelivered`].
    pub async fn send(&self, request: &HeartbeatRequest) -> Outcome {
        let policy = request.policy();
        let host = request.target().host_str().unwrap_or_default();
        let mut attempt = 1;

        loop {
            debug!(
                host,
                attempt,
                max_attempts = policy.max_attempts(),
                "sending heartbeat"
            );

            let reason = match self.attempt(request).await {
                Ok(()) => {
                    info!(host, attempt, "heartbeat delivered");
                    return Outcome::Delivered { attempts: attempt };
                }
                Err(e) => e,
            };
            debug!(host, attempt, error = %reason, "heartbeat attempt failed");

            match policy.delay_after(attempt) {
                Some(delay) => {
                    debug!(host, ?delay, "waiting before retry");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                None => {
                    warn!(host, attempts = attempt, error = %reason, "heartbeat undelivered");
                    return Outcome::Undelivered {
                        attempts: attempt,
                        reason,
                    };
                }
            }
        }
    }

    async fn attempt(&self, request: &HeartbeatRequest) -> Result<(), AttemptError> {
        let timeout = request.policy().timeout();
        // The outer deadline also bounds transports that ignore `timeout`.
        let status = tokio::time::timeout(timeout, self.transport.get(request.target(), timeout))
            .await
            .map_err(|_| AttemptError::Timeout(timeout))??;
        if status == 200 {
            Ok(())
        } else {
            Err(AttemptError::Status(status))
        }
    }
}
