use std::path::PathBuf;
use thiserror::Error;

/// Main error type for logroute
#[derive(Debug, Error)]
pub enum LogRouteError {
    // Routing errors
    #[error("Route table has no \"default\" entry")]
    MissingDefaultRoute,

    #[error("Invalid route key: {0}")]
    InvalidRouteKey(String),

    // Level errors
    #[error("Invalid log level: {0}")]
    InvalidLevel(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid configuration file: {0}")]
    InvalidConfig(String),

    #[error("Configuration validation failed: {0}")]
    ConfigValidationError(String),

    // Destination errors
    #[error("Failed to open log file {path}: {source}")]
    DestinationOpen {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write log file {path}: {source}")]
    DestinationWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Log rotation failed: {0}")]
    Rotation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for logroute operations
pub type Result<T> = std::result::Result<T, LogRouteError>;
