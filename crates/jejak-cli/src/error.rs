use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] jejak_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Cloud fetch failed: {0}")]
    Fetch(#[from] jejak_core::reconciler::FetchError),
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),
    #[error("Search query cannot be empty")]
    EmptySearchQuery,
    #[error("Invalid booking id: {0}")]
    InvalidRegistrationId(String),
    #[error("Registration not found for id: {0}")]
    RegistrationNotFound(String),
    #[error("Could not read identity image {path}: {message}")]
    IdentityImage { path: String, message: String },
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(
        "Cloud sync is not configured. Run `jejak config set --script-url <URL> --spreadsheet-id <ID>` first."
    )]
    SyncNotConfigured,
}
