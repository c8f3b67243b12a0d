//! Error types for anime-shelf-core

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for anime-shelf operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read/write config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No free name for '{path}' after {attempts} attempts")]
    NoFreeName { path: String, attempts: u32 },

    #[error("Config directory not available on this platform")]
    NoConfigDir,

    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),
}

impl Error {
    pub(crate) fn invalid_path(path: &str, reason: impl Into<String>) -> Self {
        Error::InvalidPath {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for anime-shelf operations
pub type Result<T> = std::result::Result<T, Error>;
