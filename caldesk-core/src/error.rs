//! Error types for caldesk.

use thiserror::Error;

/// Errors that can occur in caldesk operations.
#[derive(Error, Debug)]
pub enum CalDeskError {
    /// Rejected user input, e.g. saving an event without a title.
    #[error("{0}")]
    Validation(String),

    /// Stored or supplied text that could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Identity collaborator refused the request.
    #[error("{0}")]
    Auth(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for caldesk operations.
pub type CalDeskResult<T> = Result<T, CalDeskError>;
