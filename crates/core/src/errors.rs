//! Core error types for the reporting controller.
//!
//! This module defines transport-agnostic error types. HTTP-specific errors
//! (from reqwest, status codes, etc.) are converted to these types by the
//! client layer.

use chrono::ParseError as ChronoParseError;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the reporting controller.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Reporting service returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// Whether repeating the same request could succeed.
    ///
    /// Connection failures, rate limiting (429) and server-side failures (5xx)
    /// are transient. Everything else fails the same way on every attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Transport(_) => true,
            Error::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Validation errors for user input and request parameters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Page must be 1 or greater, got {0}")]
    InvalidPage(u32),

    #[error("Page size must be 1 or greater, got {0}")]
    InvalidLimit(u32),

    #[error("Unknown report category '{0}'")]
    UnknownCategory(String),

    #[error("Unknown granularity '{0}'")]
    UnknownGranularity(String),

    #[error("Report category '{0}' is not paginated")]
    NotPaginated(String),

    #[error("Failed to parse date: {0}")]
    DateParse(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Decode(err.to_string())
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateParse(err.to_string()))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(Error::Transport("connection reset".to_string()).is_transient());
        assert!(Error::Api {
            status: 503,
            message: "unavailable".to_string()
        }
        .is_transient());
        assert!(Error::Api {
            status: 429,
            message: "slow down".to_string()
        }
        .is_transient());
        assert!(!Error::Api {
            status: 404,
            message: "missing".to_string()
        }
        .is_transient());
        assert!(!Error::Decode("bad json".to_string()).is_transient());
    }

    #[test]
    fn test_validation_message() {
        let err: Error = ValidationError::InvalidPage(0).into();
        assert_eq!(
            err.to_string(),
            "Input validation failed: Page must be 1 or greater, got 0"
        );
    }
}
