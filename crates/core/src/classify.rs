//! Error classifier
//!
//! Normalizes heterogeneous failures into a [`ClassifiedError`].
//!
//! Precedence for raw failures:
//! 1. explicit cancellation        -> `VALIDATION/USER_CANCELLED`
//! 2. message mentions "timeout"   -> `TIMEOUT/EKYC_TIMEOUT`
//! 3. message mentions "network"   -> `NETWORK/NETWORK_ERROR`
//! 4. device precondition failed   -> `SDK/SDK_NOT_AVAILABLE`
//! 5. already classified           -> unchanged
//! 6. HTTP status mapping          -> see [`classify_status`]
//! 7. anything else                -> `UNKNOWN/UNKNOWN_ERROR`

use crate::error::{ClassifiedError, ErrorCode, ErrorType};

/// A caught failure, before classification
#[derive(Debug, Clone, PartialEq)]
pub enum Failure {
    /// The user dismissed the capture flow
    Cancelled,
    /// The capture device reported it cannot be used
    DeviceUnavailable,
    /// A bare error message
    Message(String),
    /// A non-success HTTP response
    Http { status: u16, message: String },
    /// Already normalized
    Classified(ClassifiedError),
}

impl Failure {
    pub fn message(message: impl Into<String>) -> Self {
        Failure::Message(message.into())
    }

    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Failure::Http {
            status,
            message: message.into(),
        }
    }
}

impl From<ClassifiedError> for Failure {
    fn from(err: ClassifiedError) -> Self {
        Failure::Classified(err)
    }
}

impl From<String> for Failure {
    fn from(message: String) -> Self {
        Failure::Message(message)
    }
}

impl From<&str> for Failure {
    fn from(message: &str) -> Self {
        Failure::Message(message.to_string())
    }
}

/// Classify any failure into the fixed taxonomy
pub fn classify(failure: impl Into<Failure>) -> ClassifiedError {
    let classified = match failure.into() {
        Failure::Cancelled => ClassifiedError::user_cancelled(),
        Failure::Classified(err) => return err,
        Failure::DeviceUnavailable => ClassifiedError::sdk_not_available(),
        Failure::Message(message) => {
            classify_message(&message).unwrap_or_else(|| {
                ClassifiedError::new(ErrorType::Unknown, ErrorCode::UnknownError, message)
            })
        }
        Failure::Http { status, message } => classify_message(&message)
            .unwrap_or_else(|| classify_status(status, message)),
    };

    tracing::debug!(
        error_type = %classified.error_type,
        code = %classified.code,
        "Classified failure"
    );
    classified
}

/// Keyword rules shared by every failure that carries a message
fn classify_message(message: &str) -> Option<ClassifiedError> {
    let lowered = message.to_lowercase();

    if lowered.contains("timeout") {
        return Some(ClassifiedError::timeout(message));
    }
    if lowered.contains("network") {
        return Some(ClassifiedError::new(
            ErrorType::Network,
            ErrorCode::NetworkError,
            message,
        ));
    }
    None
}

/// Map an HTTP status to the taxonomy
pub fn classify_status(status: u16, message: impl Into<String>) -> ClassifiedError {
    let (error_type, code) = match status {
        400 => (ErrorType::Validation, ErrorCode::BadRequest),
        401 => (ErrorType::Auth, ErrorCode::Unauthorized),
        403 => (ErrorType::Auth, ErrorCode::Forbidden),
        422 => (ErrorType::Validation, ErrorCode::Unprocessable),
        500..=599 => (ErrorType::Network, ErrorCode::ServerError),
        _ => (ErrorType::Unknown, ErrorCode::UnknownError),
    };

    ClassifiedError::new(error_type, code, message)
        .with_details(serde_json::json!({ "status": status }))
}
