//! Error types for loghub

use thiserror::Error;

/// Errors that can occur in the log pipeline
#[derive(Debug, Error)]
pub enum LogHubError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Gateway startup or serving failure
    #[error("Server error: {0}")]
    Server(String),

    /// Malformed consumer endpoint (the one unrecoverable tail failure)
    #[error("Invalid endpoint '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },
}

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, LogHubError>;
