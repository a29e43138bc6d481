//! Error types for the harness.
//!
//! Non-success HTTP statuses are never errors here: they come back as
//! [`ApiResponse`](crate::ApiResponse) data. The variants below cover the
//! faults that remain once that is taken out of the picture.

use crate::assertions::AssertionError;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Errors produced by the harness.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Transport fault: connection refused, DNS failure, timeout, body read
    /// failure or an unbuildable request.
    #[error("HTTP transport error: {0}")]
    Http(String),

    /// Request body serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration could not be loaded or failed validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An explicit expectation over a response or scenario state failed.
    #[error(transparent)]
    Assertion(#[from] AssertionError),
}

impl HarnessError {
    /// Whether this error came from the network layer rather than from the
    /// harness itself.
    pub fn is_transport(&self) -> bool {
        matches!(self, HarnessError::Http(_))
    }
}

impl From<reqwest::Error> for HarnessError {
    fn from(err: reqwest::Error) -> Self {
        HarnessError::Http(err.to_string())
    }
}
