//! Evidence upload and verification submission

use crate::error::{no_evidence_uploaded, SubmissionResult, USER_ALREADY_VERIFIED};
use crate::evidence::{EvidenceUploadOutcome, EvidenceUploads};
use crate::payload::{SubmissionPayload, SubmissionRequest};
use crate::service::{EvidenceFile, FileUploader, PersistenceApi, SaveReceipt};
use ekyc_core::{classify, ClassifiedError, ErrorCode, ErrorType, EvidenceSlot, VerifiedCapture};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use strum_macros::Display;
use tracing::{info, warn};

/// How the persistence API accepted the submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SubmissionStatus {
    Saved,
    /// The user was verified by an earlier submission
    AlreadyVerified,
}

/// Outcome of a successful submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub status: SubmissionStatus,
    pub message: Option<String>,
    pub uploads: EvidenceUploads,
    pub payload: SubmissionPayload,
}

/// Uploads evidence images and persists the verification record
pub struct EvidenceSubmitter {
    uploader: Arc<dyn FileUploader>,
    persistence: Arc<dyn PersistenceApi>,
}

impl EvidenceSubmitter {
    pub fn new(uploader: Arc<dyn FileUploader>, persistence: Arc<dyn PersistenceApi>) -> Self {
        Self {
            uploader,
            persistence,
        }
    }

    /// Upload the evidence, then save the payload exactly once
    ///
    /// Fails with `NO_EVIDENCE_UPLOADED` without calling the persistence
    /// API when every upload failed.
    pub async fn submit(
        &self,
        verified: &VerifiedCapture,
        request: &SubmissionRequest,
    ) -> SubmissionResult<SubmissionReceipt> {
        let uploads = self.upload_all(verified).await;

        if uploads.uploaded_count() == 0 {
            warn!(session_id = ?request.session_id, "No evidence uploaded, submission aborted");
            return Err(no_evidence_uploaded());
        }

        let payload = SubmissionPayload::build(verified, request, &uploads);
        info!(
            session_id = ?request.session_id,
            uploaded = uploads.uploaded_count(),
            failed = ?uploads.failed_slots(),
            "Saving verification"
        );

        let status_and_message = match self.persistence.save(&payload).await {
            Ok(receipt) => interpret_receipt(receipt)?,
            Err(err) if err.is_already_verified() => {
                (SubmissionStatus::AlreadyVerified, Some(err.to_string()))
            }
            Err(err) => {
                let classified = classify(err);
                warn!(
                    error_type = %classified.error_type,
                    code = %classified.code,
                    "Saving verification failed"
                );
                return Err(classified);
            }
        };

        let (status, message) = status_and_message;
        info!(session_id = ?request.session_id, %status, "Verification submitted");

        Ok(SubmissionReceipt {
            status,
            message,
            uploads,
            payload,
        })
    }

    /// Upload the four slots concurrently; each failure stays local to its slot
    pub async fn upload_all(&self, verified: &VerifiedCapture) -> EvidenceUploads {
        let evidence = &verified.result.evidence;

        let (front, back, near, far) = tokio::join!(
            self.upload_slot(EvidenceSlot::FrontCard, evidence.get(EvidenceSlot::FrontCard)),
            self.upload_slot(EvidenceSlot::BackCard, evidence.get(EvidenceSlot::BackCard)),
            self.upload_slot(EvidenceSlot::NearFace, evidence.get(EvidenceSlot::NearFace)),
            self.upload_slot(EvidenceSlot::FarFace, evidence.get(EvidenceSlot::FarFace)),
        );

        let mut uploads = EvidenceUploads::new();
        uploads.record(EvidenceSlot::FrontCard, front);
        uploads.record(EvidenceSlot::BackCard, back);
        uploads.record(EvidenceSlot::NearFace, near);
        uploads.record(EvidenceSlot::FarFace, far);
        uploads
    }

    async fn upload_slot(&self, slot: EvidenceSlot, path: Option<&str>) -> EvidenceUploadOutcome {
        let Some(path) = path else {
            return EvidenceUploadOutcome::Failed {
                reason: "No image captured".to_string(),
            };
        };

        let file = EvidenceFile::new(slot, path);
        match self.uploader.upload(&file).await {
            Ok(file_id) => EvidenceUploadOutcome::Uploaded { file_id },
            Err(err) => {
                warn!(%slot, error = %err, "Evidence upload failed");
                EvidenceUploadOutcome::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }
}

fn interpret_receipt(
    receipt: SaveReceipt,
) -> SubmissionResult<(SubmissionStatus, Option<String>)> {
    if receipt.success {
        return Ok((SubmissionStatus::Saved, receipt.message));
    }
    if receipt.code.as_deref() == Some(USER_ALREADY_VERIFIED) {
        return Ok((SubmissionStatus::AlreadyVerified, receipt.message));
    }

    let message = receipt
        .message
        .unwrap_or_else(|| "Verification could not be saved".to_string());
    let mut err = classify(message);
    if err.error_type == ErrorType::Unknown {
        err = ClassifiedError::new(ErrorType::Validation, ErrorCode::ValidationFailed, err.message);
    }
    if let Some(code) = receipt.code {
        err = err.with_details(serde_json::json!({ "code": code }));
    }
    Err(err)
}
