//! eKYC Core - shared model of the verification pipeline
//!
//! ```text
//! raw blob ──► ParsedResult ──► ValidationReport ──► VerifiedCapture
//!                                                       │
//! any failure ──► classify() ──► ClassifiedError ──► present()
//! ```
//!
//! ## Key Components
//!
//! - [`result::ParsedResult`] - Typed capture output, absence is `None`
//! - [`report::ValidationReport`] - Immutable verdict with structured issues
//! - [`error::ClassifiedError`] - Failure taxonomy (SDK, NETWORK, ...)
//! - [`classify::classify`] - Normalizes any failure into the taxonomy
//! - [`presentation::present`] - Dialog content for the presentation layer

pub mod classify;
pub mod error;
pub mod presentation;
pub mod report;
pub mod result;

pub use classify::{classify, classify_status, Failure};
pub use error::{ClassifiedError, EkycResult, ErrorCode, ErrorType};
pub use presentation::{present, ErrorPresentation, UserAction};
pub use report::{
    CheckKind, CheckSummary, IssueCode, IssueFamily, Severity, ValidationIssue, ValidationReport,
    VerifiedCapture,
};
pub use result::{
    CardAuthenticity, DocumentField, DocumentFields, EvidencePaths, EvidenceSlot, FaceLiveness,
    FaceMatch, MatchVerdict, ParsedResult, Sex, STATUS_SUCCESS,
};
