//! Defaults.

use std::time::Duration;

/// Origin of the hosted monitoring service.
pub const DEFAULT_BASE_URL: &str = "https://cronmonitor.app";

/// Attempts per heartbeat.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Per-attempt request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Base backoff; the wait after attempt `i` is `i * DEFAULT_BACKOFF_UNIT`.
pub const DEFAULT_BACKOFF_UNIT: Duration = Duration::from_millis(500);

/// Sent as the `User-Agent` header on every ping.
pub(crate) const USER_AGENT: &str = concat!("cronping/", env!("CARGO_PKG_VERSION"));
