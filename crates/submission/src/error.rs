//! Submission error types

use ekyc_core::{classify_status, ClassifiedError, EkycResult, ErrorCode, ErrorType, Failure};
use thiserror::Error;

/// Response code the persistence API uses for a user who is already verified
pub const USER_ALREADY_VERIFIED: &str = "USER_ALREADY_VERIFIED";

/// File upload failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    /// The service answered with `success: false`
    #[error("Upload rejected: {message}")]
    Rejected { message: String },

    #[error("Upload transport failure: {0}")]
    Transport(String),
}

impl From<UploadError> for Failure {
    fn from(err: UploadError) -> Self {
        Failure::Message(err.to_string())
    }
}

/// Persistence API failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Persistence transport failure: {0}")]
    Transport(String),
}

impl PersistenceError {
    /// Whether the API reported the user as already verified
    pub fn is_already_verified(&self) -> bool {
        matches!(
            self,
            PersistenceError::Http { code: Some(code), .. } if code == USER_ALREADY_VERIFIED
        )
    }
}

impl From<PersistenceError> for Failure {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::Http {
                status,
                code,
                message,
            } => {
                let mut classified = classify_status(status, message);
                if let Some(code) = code {
                    classified.details = Some(serde_json::json!({
                        "status": status,
                        "code": code,
                    }));
                }
                Failure::Classified(classified)
            }
            PersistenceError::Transport(message) => Failure::Message(message),
        }
    }
}

/// Fatal error when not a single evidence file could be uploaded
pub fn no_evidence_uploaded() -> ClassifiedError {
    ClassifiedError::new(
        ErrorType::Validation,
        ErrorCode::NoEvidenceUploaded,
        "No evidence image could be uploaded. Please capture your document and face again.",
    )
}

/// Result type for submission operations
pub type SubmissionResult<T> = EkycResult<T>;
