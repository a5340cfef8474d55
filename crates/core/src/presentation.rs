//! User-facing presentation of classified errors
//!
//! Picks the dialog the presentation layer shows for an error: a plain
//! dismiss for cancellation, retry-or-cancel for everything else, with
//! specific guidance for fraud and expiry verdicts.

use serde::{Deserialize, Serialize};

use crate::error::{ClassifiedError, ErrorCode, ErrorType};

/// What the user can do from the error dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserAction {
    Dismiss,
    RetryOrCancel,
}

/// Dialog content for one error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPresentation {
    pub title: &'static str,
    pub guidance: &'static str,
    pub action: UserAction,
}

const GENERIC_GUIDANCE: &str =
    "Something went wrong during verification. Please try again in good lighting.";

pub fn present(error: &ClassifiedError) -> ErrorPresentation {
    match error.code {
        ErrorCode::UserCancelled => ErrorPresentation {
            title: "Verification cancelled",
            guidance: "You can restart identity verification at any time.",
            action: UserAction::Dismiss,
        },
        ErrorCode::MaxRetriesExceeded => ErrorPresentation {
            title: "Too many attempts",
            guidance: "Please start a new verification session later.",
            action: UserAction::Dismiss,
        },
        ErrorCode::FakeDocument => ErrorPresentation {
            title: "Document could not be verified",
            guidance: "Use your original identity card. Photocopies, screens and printed photos are not accepted.",
            action: UserAction::RetryOrCancel,
        },
        ErrorCode::SpoofDetected => ErrorPresentation {
            title: "Face could not be verified",
            guidance: "Remove masks, glasses or hats and look straight at the camera.",
            action: UserAction::RetryOrCancel,
        },
        ErrorCode::DocumentExpired => ErrorPresentation {
            title: "Document expired",
            guidance: "Your identity card has expired. Please use a valid document.",
            action: UserAction::RetryOrCancel,
        },
        ErrorCode::FaceMismatch => ErrorPresentation {
            title: "Face does not match",
            guidance: "Make sure the selfie is of the card holder and your face is clearly visible.",
            action: UserAction::RetryOrCancel,
        },
        _ if error.error_type == ErrorType::Timeout => ErrorPresentation {
            title: "Verification timed out",
            guidance: "The capture took too long. Check your connection and try again.",
            action: UserAction::RetryOrCancel,
        },
        _ => ErrorPresentation {
            title: "Verification failed",
            guidance: GENERIC_GUIDANCE,
            action: UserAction::RetryOrCancel,
        },
    }
}
