//! Classified error taxonomy
//!
//! Every failure that leaves the pipeline is a [`ClassifiedError`]: a
//! message, a stable [`ErrorCode`], one of six [`ErrorType`]s, optional
//! structured details and the time it was classified.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use thiserror::Error;

/// Top-level error category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorType {
    Sdk,
    Network,
    Validation,
    Timeout,
    Auth,
    Unknown,
}

/// Stable error code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // SDK / device
    SdkNotAvailable,
    SdkNotInitialized,
    SdkError,
    InvalidResponse,

    // Flow
    UserCancelled,
    EkycTimeout,
    MaxRetriesExceeded,

    // Validation verdicts
    IncompleteResult,
    ValidationFailed,
    FaceMismatch,
    FakeDocument,
    SpoofDetected,
    DocumentExpired,
    OcrIncomplete,

    // Submission
    NoEvidenceUploaded,
    BadRequest,
    Unprocessable,

    // Transport / auth
    NetworkError,
    ServerError,
    Unauthorized,
    Forbidden,
    TokenError,

    UnknownError,
}

/// A failure normalized into the fixed taxonomy
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("[{error_type}/{code}] {message}")]
pub struct ClassifiedError {
    pub message: String,
    pub code: ErrorCode,
    pub error_type: ErrorType,
    pub details: Option<serde_json::Value>,
    pub timestamp: DateTime<Utc>,
}

impl ClassifiedError {
    pub fn new(error_type: ErrorType, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code,
            error_type,
            details: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn user_cancelled() -> Self {
        Self::new(
            ErrorType::Validation,
            ErrorCode::UserCancelled,
            "User cancelled the verification",
        )
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorType::Timeout, ErrorCode::EkycTimeout, message)
    }

    pub fn sdk_not_available() -> Self {
        Self::new(
            ErrorType::Sdk,
            ErrorCode::SdkNotAvailable,
            "eKYC capture device is not available",
        )
    }

    pub fn max_retries_exceeded(max_retries: u32) -> Self {
        Self::new(
            ErrorType::Validation,
            ErrorCode::MaxRetriesExceeded,
            format!("Max retries exceeded ({max_retries} attempts)"),
        )
    }

    pub fn is_cancellation(&self) -> bool {
        self.code == ErrorCode::UserCancelled
    }

    /// Whether the user may retry after this error
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self.code,
            ErrorCode::UserCancelled | ErrorCode::MaxRetriesExceeded
        )
    }
}

/// Result type for operations that surface classified errors
pub type EkycResult<T> = Result<T, ClassifiedError>;
