use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Core library errors
#[derive(Error, Debug)]
pub enum SweepError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error at path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Failed to access store key '{key}': {source}")]
    Store {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Scan aborted after exceeding {0:?}")]
    ScanTimeout(Duration),

    #[error("Invalid IP address: {0}")]
    InvalidIp(String),

    #[error("Reputation API key is not set")]
    MissingApiKey,

    #[error("Reputation lookup failed: {0}")]
    Reputation(String),
}

/// Problems with the TOML config file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config file '{path}': {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config file '{path}' is not valid TOML: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A value parsed but is out of range.
    #[error("Config value '{key}' {reason}")]
    Invalid {
        key: &'static str,
        reason: &'static str,
    },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, SweepError>;
