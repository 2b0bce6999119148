//! Narrative rewrite error types

use std::time::Duration;

use thiserror::Error;

/// Result type alias using NarrativeError
pub type Result<T> = std::result::Result<T, NarrativeError>;

/// Errors from the text-generation collaborator
#[derive(Debug, Error)]
pub enum NarrativeError {
    /// No API token configured
    #[error("No API token configured for narrative rewrite")]
    MissingCredential,

    /// Request did not finish in time
    #[error("Rewrite request timed out after {0:?}")]
    Timeout(Duration),

    /// API returned a non-success status
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Response body was not what the API promises
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
