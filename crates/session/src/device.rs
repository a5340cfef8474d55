//! Capture device and token provider capabilities

use async_trait::async_trait;
use ekyc_core::{ClassifiedError, ErrorCode, ErrorType, Failure};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use thiserror::Error;
use uuid::Uuid;

/// Raw device response: a JSON string, or empty when the user cancelled
pub type RawBlob = String;

/// Which capture flow the device runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CaptureKind {
    /// Document front and back, then selfie
    #[default]
    Full,
    DocumentOnly,
    FaceOnly,
}

/// Per-call options passed to the device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureOptions {
    pub kind: CaptureKind,
    pub is_retake: bool,
    pub session_id: Option<Uuid>,
}

/// Device-level failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    #[error("Capture device is not available")]
    Unavailable,

    #[error("Capture cancelled by user")]
    Cancelled,

    #[error("{0}")]
    Failed(String),
}

impl From<DeviceError> for Failure {
    fn from(err: DeviceError) -> Self {
        match err {
            DeviceError::Unavailable => Failure::DeviceUnavailable,
            DeviceError::Cancelled => Failure::Cancelled,
            DeviceError::Failed(message) => Failure::Message(message),
        }
    }
}

/// Token provider failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Token request unauthorized: {0}")]
    Unauthorized(String),

    #[error("Token request network failure: {0}")]
    Network(String),
}

impl From<TokenError> for Failure {
    fn from(err: TokenError) -> Self {
        let message = err.to_string();
        let classified = match err {
            TokenError::Unauthorized(_) => {
                ClassifiedError::new(ErrorType::Auth, ErrorCode::TokenError, message)
            }
            TokenError::Network(_) => {
                ClassifiedError::new(ErrorType::Network, ErrorCode::NetworkError, message)
            }
        };
        Failure::Classified(classified)
    }
}

/// The device bridge that runs the capture flow
///
/// Implementations must be cheap to share: the controller hands an `Arc` of
/// the device to a background task for each capture call.
#[async_trait]
pub trait CaptureDevice: Send + Sync {
    /// Device name for logging
    fn name(&self) -> &str {
        "capture_device"
    }

    /// Whether the device can be used at all
    async fn is_available(&self) -> bool;

    /// Run one capture and return the raw result blob
    async fn capture(&self, token: &str, options: &CaptureOptions) -> Result<RawBlob, DeviceError>;
}

/// Issues access tokens for the capture service
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn get_token(&self) -> Result<String, TokenError>;
}
