//! Error types for screener operations.
//!
//! This module defines [`ScreenerError`] which covers all error cases that can occur
//! when talking to the screener API or preparing a query for it.

use thiserror::Error;

/// Errors that can occur during screener operations.
#[derive(Error, Debug)]
pub enum ScreenerError {
    /// Network-related errors (connection failures, timeouts, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    ///
    /// `message` carries the server's own explanation when it sent one.
    #[error("{message}")]
    Server {
        /// HTTP status code returned by the server.
        status: u16,
        /// Server-provided detail, or the raw status line.
        message: String,
    },

    /// The requested company was not found.
    #[error("Company not found: {0}")]
    NotFound(String),

    /// Error parsing a response body.
    #[error("Parse error: {0}")]
    Parse(String),

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Client configuration is unusable.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other error.
    #[error("{0}")]
    Other(String),
}

impl ScreenerError {
    /// Returns the reason shown to the user when a screen query fails.
    ///
    /// Server errors surface the server's message; everything else uses its
    /// display form. An empty reason falls back to `"Unknown error"`.
    #[must_use]
    pub fn user_reason(&self) -> String {
        let reason = match self {
            Self::Server { message, .. } => message.clone(),
            other => other.to_string(),
        };
        if reason.trim().is_empty() {
            "Unknown error".to_string()
        } else {
            reason
        }
    }
}

/// Result type alias using [`ScreenerError`].
pub type Result<T> = std::result::Result<T, ScreenerError>;
