//! Validation engine errors
//!
//! These only cover engine construction. Findings about a capture are
//! returned in the report, never raised.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid pattern for {field}: {source}")]
    InvalidPattern {
        field: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),
}

/// Result type for validation engine setup
pub type ValidationResult<T> = Result<T, ValidationError>;
