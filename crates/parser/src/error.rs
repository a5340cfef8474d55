//! Parser errors

use thiserror::Error;

/// Fatal parse failures. Corrupted sections are not errors; they are
/// skipped and logged.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Capture result is empty")]
    Empty,

    #[error("Capture result is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Capture result must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// Result type for parser operations
pub type ParseResult<T> = Result<T, ParseError>;
