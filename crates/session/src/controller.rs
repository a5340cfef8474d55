//! Capture session controller

use crate::config::SessionConfig;
use crate::device::{CaptureDevice, CaptureKind, CaptureOptions, RawBlob, TokenProvider};
use crate::state::{
    CaptureStep, SessionHandle, SessionIdentity, SessionSnapshot, StepReceiver,
    VerificationSession,
};
use ekyc_core::{
    classify, ClassifiedError, EkycResult, ErrorCode, ErrorType, Failure, IssueFamily,
    ValidationReport, VerifiedCapture,
};
use ekyc_parser::{is_blank, parse_capture, ParseError};
use ekyc_validation::ValidationEngine;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// What a capture call did
#[derive(Debug, Clone)]
pub enum CaptureOutcome {
    /// The capture passed validation
    Completed(Box<VerifiedCapture>),
    /// Another capture was already running; nothing happened
    Ignored,
    /// The session was reset while the device was busy; the result was dropped
    Superseded,
}

impl CaptureOutcome {
    pub fn verified(&self) -> Option<&VerifiedCapture> {
        match self {
            CaptureOutcome::Completed(verified) => Some(verified),
            _ => None,
        }
    }
}

/// Drives one verification session through capture, parse and validation
///
/// All state lives behind a single lock. Every public method takes `&self`
/// so the controller can be shared between tasks via `Arc`.
pub struct CaptureSessionController {
    device: Arc<dyn CaptureDevice>,
    tokens: Arc<dyn TokenProvider>,
    engine: ValidationEngine,
    config: SessionConfig,
    session: Arc<RwLock<VerificationSession>>,
}

impl CaptureSessionController {
    pub fn new(
        device: Arc<dyn CaptureDevice>,
        tokens: Arc<dyn TokenProvider>,
        engine: ValidationEngine,
        config: SessionConfig,
    ) -> Self {
        Self {
            device,
            tokens,
            engine,
            config,
            session: Arc::new(RwLock::new(VerificationSession::new())),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Read-only view for observers
    pub fn handle(&self) -> SessionHandle {
        SessionHandle::new(Arc::clone(&self.session), self.config.max_retries)
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.session.read().await.snapshot(self.config.max_retries)
    }

    /// Check the device and establish the session identity
    ///
    /// The session id survives `reset()`; initializing again reuses it.
    ///
    /// While a capture is in progress nothing changes and the current id is
    /// returned.
    pub async fn initialize(&self) -> EkycResult<Uuid> {
        {
            let mut session = self.session.write().await;
            if let Some(session_id) = Self::busy_session_id(&session) {
                debug!(%session_id, "Initialize ignored, capture in progress");
                return Ok(session_id);
            }
            session.transition(CaptureStep::Initializing);
        }

        let available = self.device.is_available().await;

        let mut session = self.session.write().await;
        if let Some(session_id) = Self::busy_session_id(&session) {
            debug!(%session_id, "Capture started while initializing, keeping it");
            return Ok(session_id);
        }
        if !available {
            let err = classify(Failure::DeviceUnavailable);
            warn!(device = self.device.name(), "Capture device not available");
            session.transition(CaptureStep::Error);
            session.attempt.error = Some(err.clone());
            return Err(err);
        }

        session.identity.get_or_insert_with(SessionIdentity::new);
        session.attempt.error = None;
        session.transition(CaptureStep::Idle);

        let session_id = session.session_id().unwrap_or_default();
        info!(%session_id, device = self.device.name(), "Session initialized");
        Ok(session_id)
    }

    /// Run one capture attempt
    ///
    /// Returns `Ignored` without side effects when an attempt is already in
    /// progress. Once the retry budget is spent it is refused with
    /// `MAX_RETRIES_EXCEEDED` until a success or `reset()`.
    pub async fn start_capture(&self, kind: CaptureKind) -> EkycResult<CaptureOutcome> {
        self.run_attempt(kind, false, None).await
    }

    /// Re-run the last capture kind after the fixed retry delay
    ///
    /// Refused with `MAX_RETRIES_EXCEEDED` once the retry budget is spent;
    /// the device is not called in that case. A `reset()` during the delay
    /// cancels the retry with `Superseded`.
    pub async fn retry_capture(&self) -> EkycResult<CaptureOutcome> {
        let (kind, generation) = {
            let mut session = self.session.write().await;
            if session.attempt.is_processing {
                debug!("Retry ignored, capture in progress");
                return Ok(CaptureOutcome::Ignored);
            }
            if session.retries_exhausted(self.config.max_retries) {
                return Err(self.refuse_attempt(&mut session));
            }
            (session.attempt.last_kind, session.generation)
        };

        tokio::time::sleep(self.config.retry_delay()).await;
        self.run_attempt(kind, true, Some(generation)).await
    }

    /// Drop results, error and retry count; the session id is kept
    pub async fn reset(&self) {
        let mut session = self.session.write().await;
        session.reset();
        info!("Session reset");
    }

    /// Clear the last error, keeping the step
    pub async fn clear_error(&self) {
        self.session.write().await.attempt.error = None;
    }

    /// Subscribe to step changes
    pub async fn subscribe(&self) -> StepReceiver {
        self.session.read().await.subscribe()
    }

    fn busy_session_id(session: &VerificationSession) -> Option<Uuid> {
        session
            .session_id()
            .filter(|_| session.attempt.is_processing)
    }

    /// Record and return the budget refusal
    fn refuse_attempt(&self, session: &mut VerificationSession) -> ClassifiedError {
        let err = ClassifiedError::max_retries_exceeded(self.config.max_retries);
        warn!(
            retry_count = session.attempt.retry_count,
            max_retries = self.config.max_retries,
            "Capture refused, retry budget spent"
        );
        session.attempt.error = Some(err.clone());
        err
    }

    /// `expected_generation` is the generation a delayed retry was scheduled
    /// in; a reset since then supersedes it
    async fn run_attempt(
        &self,
        kind: CaptureKind,
        is_retake: bool,
        expected_generation: Option<u64>,
    ) -> EkycResult<CaptureOutcome> {
        let (generation, session_id) = {
            let mut session = self.session.write().await;
            if matches!(expected_generation, Some(expected) if expected != session.generation) {
                debug!("Session reset during retry delay, dropping retry");
                return Ok(CaptureOutcome::Superseded);
            }
            if session.attempt.is_processing {
                debug!("Capture ignored, another capture in progress");
                return Ok(CaptureOutcome::Ignored);
            }
            if !session.is_initialized() {
                let err = ClassifiedError::new(
                    ErrorType::Sdk,
                    ErrorCode::SdkNotInitialized,
                    "Session is not initialized",
                );
                session.attempt.error = Some(err.clone());
                return Err(err);
            }
            if session.retries_exhausted(self.config.max_retries) {
                return Err(self.refuse_attempt(&mut session));
            }
            session.begin_attempt(kind);
            (session.generation, session.session_id())
        };

        info!(?session_id, %kind, is_retake, "Capture started");

        let options = CaptureOptions {
            kind,
            is_retake,
            session_id,
        };
        let outcome = self.capture_and_score(options, generation).await;

        let mut session = self.session.write().await;
        if session.generation != generation {
            debug!("Session reset during capture, dropping outcome");
            return Ok(CaptureOutcome::Superseded);
        }

        match outcome {
            Ok(verified) => {
                info!(?session_id, "Capture completed");
                session.complete(verified.clone());
                Ok(CaptureOutcome::Completed(Box::new(verified)))
            }
            Err(err) => {
                warn!(
                    ?session_id,
                    error_type = %err.error_type,
                    code = %err.code,
                    "Capture failed"
                );
                session.fail(err.clone());
                Err(err)
            }
        }
    }

    async fn capture_and_score(
        &self,
        options: CaptureOptions,
        generation: u64,
    ) -> EkycResult<VerifiedCapture> {
        let token = self.tokens.get_token().await.map_err(classify)?;
        let raw = self.call_device(token, options).await?;

        if is_blank(&raw) {
            return Err(classify(Failure::Cancelled));
        }

        {
            let mut session = self.session.write().await;
            if session.generation == generation {
                session.transition(CaptureStep::Processing);
            }
        }

        let result = parse_capture(&raw).map_err(|e| match e {
            ParseError::Empty => classify(Failure::Cancelled),
            other => ClassifiedError::new(
                ErrorType::Sdk,
                ErrorCode::InvalidResponse,
                format!("Invalid capture response: {other}"),
            ),
        })?;

        if !result.is_content_bearing() {
            return Err(ClassifiedError::new(
                ErrorType::Validation,
                ErrorCode::IncompleteResult,
                "Capture returned no usable results",
            ));
        }

        let report = self.engine.validate_now(&result);
        if !report.is_valid() {
            return Err(rejection(&report));
        }

        Ok(VerifiedCapture::new(result, report))
    }

    /// Run the device call on its own task, bounded by the capture timeout
    ///
    /// On expiry the task is left to finish in the background; its result
    /// is discarded.
    async fn call_device(&self, token: String, options: CaptureOptions) -> EkycResult<RawBlob> {
        let device = Arc::clone(&self.device);
        let task = tokio::spawn(async move { device.capture(&token, &options).await });

        match tokio::time::timeout(self.config.capture_timeout(), task).await {
            Err(_) => Err(ClassifiedError::timeout(format!(
                "Capture timeout after {}s",
                self.config.capture_timeout_secs
            ))),
            Ok(Err(join_err)) => Err(classify(format!("Capture task failed: {join_err}"))),
            Ok(Ok(result)) => result.map_err(classify),
        }
    }
}

/// Error for a report that failed validation, coded by its most severe family
fn rejection(report: &ValidationReport) -> ClassifiedError {
    let code = match report.dominant_family() {
        Some(IssueFamily::FakeDocument) => ErrorCode::FakeDocument,
        Some(IssueFamily::Spoof) => ErrorCode::SpoofDetected,
        Some(IssueFamily::FaceMismatch) => ErrorCode::FaceMismatch,
        Some(IssueFamily::ExpiredDocument) => ErrorCode::DocumentExpired,
        Some(IssueFamily::OcrIncomplete) => ErrorCode::OcrIncomplete,
        Some(IssueFamily::Other) | None => ErrorCode::ValidationFailed,
    };

    let message = report.error_messages().join("; ");
    let issues = serde_json::to_value(report.errors()).unwrap_or_default();

    ClassifiedError::new(ErrorType::Validation, code, message)
        .with_details(serde_json::json!({ "errors": issues }))
}
