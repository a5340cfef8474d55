//! Per-slot upload outcomes

use crate::service::FileId;
use ekyc_core::EvidenceSlot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Result of uploading one evidence slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EvidenceUploadOutcome {
    Uploaded { file_id: FileId },
    Failed { reason: String },
}

impl EvidenceUploadOutcome {
    pub fn file_id(&self) -> Option<&str> {
        match self {
            EvidenceUploadOutcome::Uploaded { file_id } => Some(file_id),
            EvidenceUploadOutcome::Failed { .. } => None,
        }
    }

    pub fn is_uploaded(&self) -> bool {
        matches!(self, EvidenceUploadOutcome::Uploaded { .. })
    }
}

/// Outcomes for all four slots
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceUploads {
    outcomes: BTreeMap<EvidenceSlot, EvidenceUploadOutcome>,
}

impl EvidenceUploads {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, slot: EvidenceSlot, outcome: EvidenceUploadOutcome) {
        self.outcomes.insert(slot, outcome);
    }

    pub fn get(&self, slot: EvidenceSlot) -> Option<&EvidenceUploadOutcome> {
        self.outcomes.get(&slot)
    }

    pub fn file_id(&self, slot: EvidenceSlot) -> Option<&str> {
        self.get(slot).and_then(EvidenceUploadOutcome::file_id)
    }

    /// Successfully uploaded file ids, in slot order
    pub fn file_ids(&self) -> Vec<&str> {
        self.outcomes
            .values()
            .filter_map(EvidenceUploadOutcome::file_id)
            .collect()
    }

    pub fn uploaded_count(&self) -> usize {
        self.outcomes.values().filter(|o| o.is_uploaded()).count()
    }

    pub fn failed_slots(&self) -> Vec<EvidenceSlot> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| !outcome.is_uploaded())
            .map(|(slot, _)| *slot)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EvidenceSlot, &EvidenceUploadOutcome)> {
        self.outcomes.iter()
    }
}
