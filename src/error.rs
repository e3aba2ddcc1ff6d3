//! Error types for the debug logger

use std::io;
use thiserror::Error;

/// Result type alias for logger configuration
pub type Result<T> = std::result::Result<T, DebugLogError>;

/// Errors that can occur while configuring the debug logger.
///
/// Emitting records never fails; only loading configuration and opening
/// destinations do.
#[derive(Error, Debug)]
pub enum DebugLogError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON configuration error
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML configuration error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unrecognized flag name
    #[error("Unknown flag: {0}")]
    UnknownFlag(String),
}

impl From<String> for DebugLogError {
    fn from(s: String) -> Self {
        DebugLogError::Config(s)
    }
}
