//! Error handling module for startup-fatal conditions

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Errors that stop a run before or outside per-file processing
#[derive(Error, Debug)]
pub enum NormalizeError {
    /// Working directory missing or not a directory
    #[error("invalid working directory: {}", .path.display())]
    InvalidWorkingDirectory { path: PathBuf },

    /// Config file explicitly requested but not readable
    #[error("cannot read config file {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for our schema
    #[error("cannot parse config file {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Environment override with an unusable value
    #[error("invalid value for {name}: {value:?}")]
    InvalidEnv { name: String, value: String },

    /// Domain error outside a file boundary (e.g. config validation)
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Result type alias for startup operations
pub type NormalizeResult<T> = std::result::Result<T, NormalizeError>;
