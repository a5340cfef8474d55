//! eKYC Submission - evidence upload and verification persistence
//!
//! ```text
//! VerifiedCapture ──► upload ×4 (concurrent) ──► SubmissionPayload ──► save
//!                         │
//!                         └── zero uploads ──► NO_EVIDENCE_UPLOADED
//! ```

pub mod error;
pub mod evidence;
pub mod mock;
pub mod payload;
pub mod service;
pub mod submitter;

pub use error::{
    no_evidence_uploaded, PersistenceError, SubmissionResult, UploadError, USER_ALREADY_VERIFIED,
};
pub use evidence::{EvidenceUploadOutcome, EvidenceUploads};
pub use mock::{MockFileUploader, MockPersistenceApi};
pub use payload::{
    clamp_non_negative, clamp_unit, SubmissionPayload, SubmissionRequest, SupplementaryFields,
};
pub use service::{EvidenceFile, FileId, FileUploader, PersistenceApi, SaveReceipt};
pub use submitter::{EvidenceSubmitter, SubmissionReceipt, SubmissionStatus};
