//! Ping-on-success heartbeats for cron-monitoring services.
//!
//! A monitored job calls [`Monitor::wrap`] (or [`Monitor::ping`] after it
//! finishes cleanly). The heartbeat is a single `GET <base>/ping/<token>`
//! retried with linear backoff. Delivery failures are reported through
//! [`Outcome`] and logged, never returned as errors, so a flaky network can
//! not turn a successful job into a failed one.

mod client;
mod constants;
mod error;
mod http;
mod monitor;
mod policy;
mod target;
mod transport;

pub use client::{HeartbeatClient, HeartbeatRequest, HeartbeatRequestBuilder, Outcome};
pub use constants::{DEFAULT_BACKOFF_UNIT, DEFAULT_BASE_URL, DEFAULT_MAX_ATTEMPTS, DEFAULT_TIMEOUT};
pub use error::{AttemptError, ConfigError};
pub use monitor::{Monitor, MonitorBuilder, ping};
pub use policy::RetryPolicy;
pub use target::{parse_target, ping_url};
pub use transport::{HttpTransport, Transport};
