//! Error types for jejak-core

use thiserror::Error;

/// Result type alias using jejak-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in jejak-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// libSQL error
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Registration not found
    #[error("Registration not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
