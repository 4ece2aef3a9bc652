use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Environment '{environment_id}' not found for application '{application}'")]
    EnvironmentNotFound {
        application: String,
        environment_id: String,
    },

    #[error("Expected exactly one configuration settings record, got {count}")]
    AmbiguousConfigurationResult { count: usize },

    #[error(
        "Client Error: {message}\n\nNO CHANGES MADE. Please run the command again when the environment state settles"
    )]
    RemoteUpdateRejected { message: String },

    #[error("Remote call {operation} failed: {message}")]
    Remote {
        operation: &'static str,
        message: String,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml_ng::Error,
    },

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[source] serde_yaml_ng::Error),

    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Terminal I/O failed: {0}")]
    Terminal(#[source] std::io::Error),

    #[error("Region is required; pass --region or set `region` in beanstalker.toml")]
    RegionRequired,

    #[error("Unknown action '{0}' (expected 'get' or 'update')")]
    UnknownAction(String),

    #[error("The update action requires a configuration file argument")]
    MissingFile,

    #[error("Unknown key '{key}' in {path} (line {line})")]
    UnknownSettingsKey {
        key: String,
        path: PathBuf,
        line: usize,
    },

    #[error("Unknown keys in settings file")]
    UnknownSettingsKeys(Vec<SyncError>),

    #[error("Failed to parse {path}: {source}")]
    SettingsParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid value for '{key}': {reason}")]
    InvalidSetting { key: String, reason: String },

    #[error("Settings error: {0}")]
    Settings(#[from] confique::Error),
}

impl SyncError {
    /// Process exit code for this error. Usage mistakes exit with 2.
    pub fn exit_code(&self) -> u8 {
        match self {
            SyncError::UnknownAction(_) | SyncError::MissingFile => 2,
            _ => 1,
        }
    }
}
