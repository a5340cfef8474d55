//! Session state machine
//!
//! ```text
//! IDLE ─► INITIALIZING ─► IDLE ─► CAPTURING ─► PROCESSING ─► COMPLETED
//!              │                      │             │
//!              └──────────────────────┴─────────────┴──► ERROR ─► CAPTURING (retry)
//! ```
//!
//! `reset()` returns any state to IDLE.

use crate::device::CaptureKind;
use chrono::{DateTime, Utc};
use ekyc_core::{ClassifiedError, VerifiedCapture};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use strum_macros::Display;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

/// Buffered step changes per subscriber before the oldest are dropped
const STEP_CHANNEL_CAPACITY: usize = 32;

/// Stream of step changes, one message per transition
pub type StepReceiver = broadcast::Receiver<CaptureStep>;

/// Current step of the capture flow
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CaptureStep {
    #[default]
    Idle,
    Initializing,
    Capturing,
    Processing,
    Completed,
    Error,
}

impl CaptureStep {
    /// Whether the step ends an attempt
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }

    /// Allowed forward transitions (reset is always allowed)
    pub fn can_transition_to(&self, next: CaptureStep) -> bool {
        use CaptureStep::*;
        matches!(
            (self, next),
            (Idle, Initializing)
                | (Initializing, Idle)
                | (Initializing, Error)
                | (Idle, Capturing)
                | (Completed, Capturing)
                | (Error, Capturing)
                | (Capturing, Processing)
                | (Capturing, Error)
                | (Processing, Completed)
                | (Processing, Error)
        )
    }
}

/// Identity of an initialized session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    pub session_id: Uuid,
    pub initialized_at: DateTime<Utc>,
}

impl SessionIdentity {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            initialized_at: Utc::now(),
        }
    }
}

impl Default for SessionIdentity {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-attempt state, replaced wholesale on reset
#[derive(Debug, Clone, Default)]
pub struct AttemptState {
    pub current_step: CaptureStep,
    pub is_processing: bool,
    pub results: Option<VerifiedCapture>,
    pub error: Option<ClassifiedError>,
    pub retry_count: u32,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub last_kind: CaptureKind,
}

/// Full session: identity plus the attempt in progress
#[derive(Debug)]
pub struct VerificationSession {
    pub identity: Option<SessionIdentity>,
    pub attempt: AttemptState,
    /// Bumped on every reset; in-flight captures from an older
    /// generation must not write their outcome
    pub(crate) generation: u64,
    steps: broadcast::Sender<CaptureStep>,
}

impl Default for VerificationSession {
    fn default() -> Self {
        Self::new()
    }
}

impl VerificationSession {
    pub fn new() -> Self {
        let (steps, _) = broadcast::channel(STEP_CHANNEL_CAPACITY);
        Self {
            identity: None,
            attempt: AttemptState::default(),
            generation: 0,
            steps,
        }
    }

    /// Receive every step entered from now on
    pub fn subscribe(&self) -> StepReceiver {
        self.steps.subscribe()
    }

    pub fn is_initialized(&self) -> bool {
        self.identity.is_some()
    }

    pub fn session_id(&self) -> Option<Uuid> {
        self.identity.as_ref().map(|identity| identity.session_id)
    }

    /// Move to `next`, logging the edge
    pub(crate) fn transition(&mut self, next: CaptureStep) {
        let current = self.attempt.current_step;
        if !current.can_transition_to(next) {
            tracing::warn!(from = %current, to = %next, "Unexpected session transition");
        }
        tracing::debug!(
            session_id = ?self.session_id(),
            from = %current,
            to = %next,
            "Session transition"
        );
        self.attempt.current_step = next;
        // No receivers is fine
        let _ = self.steps.send(next);
    }

    /// Whether failed attempts have used up the retry budget
    pub fn retries_exhausted(&self, max_retries: u32) -> bool {
        self.attempt.retry_count >= max_retries
    }

    /// Enter CAPTURING and take the processing guard
    pub(crate) fn begin_attempt(&mut self, kind: CaptureKind) {
        self.transition(CaptureStep::Capturing);
        self.attempt.is_processing = true;
        self.attempt.last_kind = kind;
        self.attempt.error = None;
        self.attempt.start_time = Some(Utc::now());
        self.attempt.end_time = None;
    }

    pub(crate) fn complete(&mut self, verified: VerifiedCapture) {
        self.transition(CaptureStep::Completed);
        self.attempt.is_processing = false;
        self.attempt.results = Some(verified);
        self.attempt.error = None;
        self.attempt.retry_count = 0;
        self.attempt.end_time = Some(Utc::now());
    }

    /// Record a failed attempt and count it against the retry budget
    pub(crate) fn fail(&mut self, error: ClassifiedError) {
        self.transition(CaptureStep::Error);
        self.attempt.is_processing = false;
        self.attempt.error = Some(error);
        self.attempt.retry_count += 1;
        self.attempt.end_time = Some(Utc::now());
    }

    /// Back to IDLE with no results, error or retries; identity is kept
    pub fn reset(&mut self) {
        self.attempt = AttemptState::default();
        self.generation += 1;
        let _ = self.steps.send(CaptureStep::Idle);
    }

    pub fn snapshot(&self, max_retries: u32) -> SessionSnapshot {
        let can_retry = self.attempt.current_step == CaptureStep::Error
            && !self.retries_exhausted(max_retries)
            && self
                .attempt
                .error
                .as_ref()
                .map_or(true, ClassifiedError::is_retryable);

        SessionSnapshot {
            session_id: self.session_id(),
            is_initialized: self.is_initialized(),
            current_step: self.attempt.current_step,
            is_processing: self.attempt.is_processing,
            results: self.attempt.results.clone(),
            error: self.attempt.error.clone(),
            retry_count: self.attempt.retry_count,
            can_retry,
            start_time: self.attempt.start_time,
            end_time: self.attempt.end_time,
        }
    }
}

/// Point-in-time copy of the session for the presentation layer
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Option<Uuid>,
    pub is_initialized: bool,
    pub current_step: CaptureStep,
    pub is_processing: bool,
    pub results: Option<VerifiedCapture>,
    pub error: Option<ClassifiedError>,
    pub retry_count: u32,
    pub can_retry: bool,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

/// Read-only view of a controller's session
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<RwLock<VerificationSession>>,
    max_retries: u32,
}

impl SessionHandle {
    pub(crate) fn new(inner: Arc<RwLock<VerificationSession>>, max_retries: u32) -> Self {
        Self { inner, max_retries }
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.inner.read().await.snapshot(self.max_retries)
    }

    pub async fn current_step(&self) -> CaptureStep {
        self.inner.read().await.attempt.current_step
    }

    pub async fn session_id(&self) -> Option<Uuid> {
        self.inner.read().await.session_id()
    }

    pub async fn error(&self) -> Option<ClassifiedError> {
        self.inner.read().await.attempt.error.clone()
    }

    pub async fn subscribe(&self) -> StepReceiver {
        self.inner.read().await.subscribe()
    }
}
