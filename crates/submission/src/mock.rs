//! In-memory file service and persistence API for testing

use crate::error::{PersistenceError, UploadError};
use crate::payload::SubmissionPayload;
use crate::service::{EvidenceFile, FileId, FileUploader, PersistenceApi, SaveReceipt};
use async_trait::async_trait;
use ekyc_core::EvidenceSlot;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// File uploader that rejects configured slots and accepts the rest
#[derive(Default)]
pub struct MockFileUploader {
    failing: Mutex<HashSet<EvidenceSlot>>,
    uploaded: Mutex<Vec<EvidenceFile>>,
    counter: AtomicUsize,
}

impl MockFileUploader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_slot(&self, slot: EvidenceSlot) {
        lock(&self.failing).insert(slot);
    }

    /// Files accepted so far
    pub fn uploaded(&self) -> Vec<EvidenceFile> {
        lock(&self.uploaded).clone()
    }

    /// Upload calls received, accepted or not
    pub fn calls(&self) -> usize {
        self.counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FileUploader for MockFileUploader {
    async fn upload(&self, file: &EvidenceFile) -> Result<FileId, UploadError> {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;

        if lock(&self.failing).contains(&file.slot) {
            return Err(UploadError::Rejected {
                message: format!("{} was rejected", file.title),
            });
        }

        lock(&self.uploaded).push(file.clone());
        Ok(format!("file-{}-{n}", file.slot))
    }
}

/// Persistence API with a fixed answer that records every payload
pub struct MockPersistenceApi {
    response: Mutex<Result<SaveReceipt, PersistenceError>>,
    saved: Mutex<Vec<SubmissionPayload>>,
}

impl MockPersistenceApi {
    pub fn new() -> Self {
        Self {
            response: Mutex::new(Ok(SaveReceipt {
                success: true,
                message: Some("Verification saved".to_string()),
                code: None,
            })),
            saved: Mutex::new(Vec::new()),
        }
    }

    pub fn respond_with(&self, response: Result<SaveReceipt, PersistenceError>) {
        *lock(&self.response) = response;
    }

    /// Payloads received by `save`
    pub fn saved(&self) -> Vec<SubmissionPayload> {
        lock(&self.saved).clone()
    }
}

impl Default for MockPersistenceApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PersistenceApi for MockPersistenceApi {
    async fn save(&self, payload: &SubmissionPayload) -> Result<SaveReceipt, PersistenceError> {
        lock(&self.saved).push(payload.clone());
        lock(&self.response).clone()
    }
}
