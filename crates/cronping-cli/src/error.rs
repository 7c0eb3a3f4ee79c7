use std::path::PathBuf;

pub type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("read config {}: {source}", path.display())]
    ReadConfig {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse config {}: {source}", path.display())]
    ParseConfig {
        path: PathBuf,
        source: serde_yaml_ng::Error,
    },

    #[error("no ping target: set --token or --url (or CRONPING_TOKEN / CRONPING_URL)")]
    MissingTarget,

    #[error(transparent)]
    Config(#[from] cronping::ConfigError),

    #[error("no command given")]
    MissingCommand,

    #[error("spawn {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("wait for job: {0}")]
    Wait(std::io::Error),
}

impl CliError {
    /// Process exit code for this error. Configuration problems exit 2;
    /// a job that cannot be started exits like a shell would: 126 when the
    /// file exists but is not executable, 127 otherwise.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::ReadConfig { .. }
            | Self::ParseConfig { .. }
            | Self::MissingTarget
            | Self::Config(_)
            | Self::MissingCommand => 2,
            Self::Spawn { source, .. } if source.kind() == std::io::ErrorKind::PermissionDenied => {
                126
            }
            Self::Spawn { .. } => 127,
            Self::Wait(_) => 1,
        }
    }
}
