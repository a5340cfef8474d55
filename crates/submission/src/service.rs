//! Upload and persistence capabilities

use crate::error::{PersistenceError, UploadError};
use crate::payload::SubmissionPayload;
use async_trait::async_trait;
use ekyc_core::EvidenceSlot;
use serde::{Deserialize, Serialize};

/// Identifier returned by the file service
pub type FileId = String;

/// One evidence image to upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceFile {
    pub slot: EvidenceSlot,
    pub path: String,
    pub title: String,
    pub description: String,
}

impl EvidenceFile {
    pub fn new(slot: EvidenceSlot, path: impl Into<String>) -> Self {
        let (title, description) = match slot {
            EvidenceSlot::FrontCard => ("front_card", "Front side of the identity card"),
            EvidenceSlot::BackCard => ("back_card", "Back side of the identity card"),
            EvidenceSlot::NearFace => ("near_face", "Portrait captured close to the camera"),
            EvidenceSlot::FarFace => ("far_face", "Portrait captured far from the camera"),
        };
        Self {
            slot,
            path: path.into(),
            title: title.to_string(),
            description: description.to_string(),
        }
    }
}

/// Answer of a successful save call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveReceipt {
    pub success: bool,
    pub message: Option<String>,
    pub code: Option<String>,
}

/// Uploads evidence images
#[async_trait]
pub trait FileUploader: Send + Sync {
    async fn upload(&self, file: &EvidenceFile) -> Result<FileId, UploadError>;
}

/// Persists the verification record
#[async_trait]
pub trait PersistenceApi: Send + Sync {
    async fn save(&self, payload: &SubmissionPayload) -> Result<SaveReceipt, PersistenceError>;
}
