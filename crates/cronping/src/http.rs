//! `reqwest` client construction with the `ring` TLS crypto provider
//! installed on first use.

use std::sync::Once;

use crate::constants::USER_AGENT;
use crate::error::ConfigError;

static INIT: Once = Once::new();

fn ensure_provider() {
    INIT.call_once(|| {
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}

/// Build the HTTP client used for pings. Timeouts are applied per request.
pub(crate) fn client() -> Result<reqwest::Client, ConfigError> {
    ensure_provider();
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| ConfigError::HttpClient(e.to_string()))
}
