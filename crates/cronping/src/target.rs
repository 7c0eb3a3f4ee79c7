//! Ping URLs: `<base>/ping/<token>`.

use url::Url;

use crate::error::ConfigError;

/// Parse an explicit ping target. Must be an absolute `http(s)` URL.
pub fn parse_target(target: &str) -> Result<Url, ConfigError> {
    let target = target.trim();
    if target.is_empty() {
        return Err(ConfigError::EmptyTarget);
    }
    let url = Url::parse(target).map_err(|e| ConfigError::InvalidTarget {
        target: target.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidTarget {
            target: target.to_string(),
            reason: format!("unsupported scheme {other:?}"),
        }),
    }
}

/// Build the ping URL for `token` under the service origin `base`.
pub fn ping_url(base: &str, token: &str) -> Result<Url, ConfigError> {
    let token = token.trim();
    if token.is_empty()
        || token.contains(['/', '\\', '?', '#'])
        || token.contains(char::is_whitespace)
    {
        return Err(ConfigError::InvalidToken(token.to_string()));
    }
    let base = base.trim().trim_end_matches('/');
    if base.is_empty() {
        return Err(ConfigError::EmptyTarget);
    }
    let url = parse_target(&format!("{base}/ping/{token}"))?;
    // Dot segments (raw or percent-encoded) are collapsed while parsing.
    if !url.path().ends_with(&format!("/ping/{token}")) {
        return Err(ConfigError::InvalidToken(token.to_string()));
    }
    Ok(url)
}
