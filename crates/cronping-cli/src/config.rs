//! Heartbeat settings: flags and environment first, then the optional YAML
//! config file, then library defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Args;
use cronping::{DEFAULT_BACKOFF_UNIT, DEFAULT_BASE_URL, DEFAULT_MAX_ATTEMPTS, DEFAULT_TIMEOUT, Monitor};
use serde::Deserialize;

use crate::error::{CliError, CliResult};

#[derive(Args, Debug, Default)]
pub struct PingOptions {
    /// Ping token of the monitored job
    #[arg(long, global = true, env = "CRONPING_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Full ping URL (overrides --token and --base-url)
    #[arg(long, global = true, env = "CRONPING_URL", hide_env_values = true)]
    pub url: Option<String>,

    /// Monitoring service origin [default: https://cronmonitor.app]
    #[arg(long, global = true, env = "CRONPING_BASE_URL")]
    pub base_url: Option<String>,

    /// Delivery attempts per heartbeat [default: 3]
    #[arg(long, global = true, env = "CRONPING_RETRIES")]
    pub retries: Option<u32>,

    /// Per-attempt timeout in seconds [default: 10]
    #[arg(long = "timeout", global = true, env = "CRONPING_TIMEOUT", value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Backoff unit in milliseconds; attempt i waits i * unit [default: 500]
    #[arg(long, global = true, env = "CRONPING_BACKOFF_MS", value_name = "MS")]
    pub backoff_ms: Option<u64>,

    /// YAML file with any of the settings above
    #[arg(long, global = true, env = "CRONPING_CONFIG")]
    pub config: Option<PathBuf>,
}

/// On-disk config. Keys mirror the long flags.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub token: Option<String>,
    pub url: Option<String>,
    pub base_url: Option<String>,
    pub retries: Option<u32>,
    pub timeout_secs: Option<u64>,
    pub backoff_ms: Option<u64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| CliError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml_ng::from_str(&content).map_err(|source| CliError::ParseConfig {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Url(String),
    Token { base_url: String, token: String },
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub target: Target,
    pub retries: u32,
    pub timeout: Duration,
    pub backoff_unit: Duration,
}

impl Settings {
    /// Resolve `options`, loading the config file they point at.
    pub fn load(options: &PingOptions) -> CliResult<Self> {
        let file = match &options.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::resolve(options, file)
    }

    /// Flags and env form one layer, the file another. The first layer that
    /// names a url or token decides the target; within a layer url wins.
    pub fn resolve(options: &PingOptions, file: FileConfig) -> CliResult<Self> {
        let base_url = options
            .base_url
            .clone()
            .or(file.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let target = match (&options.url, &options.token, file.url, file.token) {
            (Some(url), _, _, _) => Target::Url(url.clone()),
            (None, Some(token), _, _) => Target::Token {
                base_url,
                token: token.clone(),
            },
            (None, None, Some(url), _) => Target::Url(url),
            (None, None, None, Some(token)) => Target::Token { base_url, token },
            (None, None, None, None) => return Err(CliError::MissingTarget),
        };

        Ok(Self {
            target,
            retries: options
                .retries
                .or(file.retries)
                .unwrap_or(DEFAULT_MAX_ATTEMPTS),
            timeout: options
                .timeout_secs
                .or(file.timeout_secs)
                .map_or(DEFAULT_TIMEOUT, Duration::from_secs),
            backoff_unit: options
                .backoff_ms
                .or(file.backoff_ms)
                .map_or(DEFAULT_BACKOFF_UNIT, Duration::from_millis),
        })
    }

    pub fn monitor(&self) -> CliResult<Monitor> {
        let builder = Monitor::builder()
            .max_attempts(self.retries)
            .timeout(self.timeout)
            .backoff_unit(self.backoff_unit);
        let builder = match &self.target {
            Target::Url(url) => builder.target(url),
            Target::Token { base_url, token } => builder.base_url(base_url).token(token),
        };
        Ok(builder.build()?)
    }
}
