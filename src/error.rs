// src/error.rs

//! Unified error handling for the watcher.

use std::fmt;

use thiserror::Error;

/// Result type alias for watcher operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// State file could not be read or written
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Notification relay unreachable or rejected the payload
    #[error("Notification delivery error: {0}")]
    Notify(String),
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a persistence error.
    pub fn persistence(message: impl fmt::Display) -> Self {
        Self::Persistence(message.to_string())
    }

    /// Create a notification delivery error.
    pub fn notify(message: impl fmt::Display) -> Self {
        Self::Notify(message.to_string())
    }
}

/// Why an extractor could not produce a reading this cycle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// Remote unreachable, timed out, or answered with a non-2xx status
    #[error("network error: {0}")]
    Network(String),

    /// Payload could not be parsed as the expected structure
    #[error("parse error: {0}")]
    Parse(String),

    /// Payload parsed but the expected fields are missing
    #[error("schema error: {0}")]
    Schema(String),
}

impl ExtractionError {
    /// Create a network error.
    pub fn network(message: impl fmt::Display) -> Self {
        Self::Network(message.to_string())
    }

    /// Create a parse error.
    pub fn parse(message: impl fmt::Display) -> Self {
        Self::Parse(message.to_string())
    }

    /// Create a schema error for a payload missing expected fields.
    pub fn schema(message: impl fmt::Display) -> Self {
        Self::Schema(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_error_display() {
        assert_eq!(
            ExtractionError::network("timed out").to_string(),
            "network error: timed out"
        );
        assert_eq!(
            ExtractionError::schema("missing /limit").to_string(),
            "schema error: missing /limit"
        );
    }

    #[test]
    fn test_selector_error_display() {
        let err = AppError::selector("[[bad", "unexpected token");
        assert_eq!(
            err.to_string(),
            "Invalid selector '[[bad': unexpected token"
        );
    }
}
