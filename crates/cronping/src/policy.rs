//! Retry policy: attempt budget, per-attempt timeout and linear backoff.

use std::time::Duration;

use crate::constants::{DEFAULT_BACKOFF_UNIT, DEFAULT_MAX_ATTEMPTS, DEFAULT_TIMEOUT};
use crate::error::ConfigError;

/// Bounded retry with linear backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    timeout: Duration,
    backoff_unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            timeout: DEFAULT_TIMEOUT,
            backoff_unit: DEFAULT_BACKOFF_UNIT,
        }
    }
}

impl RetryPolicy {
    /// Validate and build a policy. A zero `backoff_unit` is allowed and
    /// means retries happen back to back.
    pub fn new(
        max_attempts: u32,
        timeout: Duration,
        backoff_unit: Duration,
    ) -> Result<Self, ConfigError> {
        if max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        if timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(Self {
            max_attempts,
            timeout,
            backoff_unit,
        })
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn backoff_unit(&self) -> Duration {
        self.backoff_unit
    }

    /// Wait inserted after failed attempt `attempt` (1-based), before the
    /// next one. `None` once the attempt budget is spent.
    pub fn delay_after(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 || attempt >= self.max_attempts {
            return None;
        }
        Some(self.backoff_unit.saturating_mul(attempt))
    }

    /// Longest a single `send` can block: every attempt timing out plus
    /// every backoff.
    pub fn worst_case(&self) -> Duration {
        let requests = self.timeout.saturating_mul(self.max_attempts);
        // unit * (1 + 2 + .. + (n - 1))
        let n = u128::from(self.max_attempts);
        let backoff_nanos = self
            .backoff_unit
            .as_nanos()
            .saturating_mul(n * n.saturating_sub(1) / 2);
        let backoff = u64::try_from(backoff_nanos).map_or(Duration::MAX, Duration::from_nanos);
        requests.saturating_add(backoff)
    }
}
