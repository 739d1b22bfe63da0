//! Error types for partydir.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in partydir operations.
#[derive(Error, Debug)]
pub enum PartyDirError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Data directory not found: {}", .0.display())]
    DataDirNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Submission rejected: {0}")]
    Submission(String),
}

/// Result type alias for partydir operations.
pub type PartyDirResult<T> = Result<T, PartyDirError>;
