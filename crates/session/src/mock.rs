//! Scripted device and token provider for testing

use crate::device::{CaptureDevice, CaptureOptions, DeviceError, RawBlob, TokenError, TokenProvider};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// Capture device that replays queued responses
///
/// When the queue runs dry the last response is repeated; with nothing
/// ever queued the device reports an empty blob (user cancelled).
pub struct MockCaptureDevice {
    available: AtomicBool,
    responses: Mutex<VecDeque<Result<RawBlob, DeviceError>>>,
    fallback: Mutex<Option<Result<RawBlob, DeviceError>>>,
    delay: Mutex<Option<Duration>>,
    calls: AtomicUsize,
    last_options: Mutex<Option<CaptureOptions>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockCaptureDevice {
    pub fn new() -> Self {
        Self {
            available: AtomicBool::new(true),
            responses: Mutex::new(VecDeque::new()),
            fallback: Mutex::new(None),
            delay: Mutex::new(None),
            calls: AtomicUsize::new(0),
            last_options: Mutex::new(None),
        }
    }

    /// Device that always returns the same blob
    pub fn returning(raw: impl Into<String>) -> Self {
        let device = Self::new();
        device.push_blob(raw);
        device
    }

    /// Device that always fails with the same error
    pub fn failing(error: DeviceError) -> Self {
        let device = Self::new();
        device.push_error(error);
        device
    }

    pub fn push_blob(&self, raw: impl Into<String>) {
        self.push(Ok(raw.into()));
    }

    pub fn push_error(&self, error: DeviceError) {
        self.push(Err(error));
    }

    fn push(&self, response: Result<RawBlob, DeviceError>) {
        lock(&self.responses).push_back(response);
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Make every capture wait before answering
    pub fn set_delay(&self, delay: Duration) {
        *lock(&self.delay) = Some(delay);
    }

    /// Number of capture calls received
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_options(&self) -> Option<CaptureOptions> {
        lock(&self.last_options).clone()
    }

    fn next_response(&self) -> Result<RawBlob, DeviceError> {
        let mut responses = lock(&self.responses);
        let mut fallback = lock(&self.fallback);

        match responses.pop_front() {
            Some(response) => {
                *fallback = Some(response.clone());
                response
            }
            None => fallback.clone().unwrap_or_else(|| Ok(String::new())),
        }
    }
}

impl Default for MockCaptureDevice {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CaptureDevice for MockCaptureDevice {
    fn name(&self) -> &str {
        "mock_device"
    }

    async fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn capture(&self, _token: &str, options: &CaptureOptions) -> Result<RawBlob, DeviceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *lock(&self.last_options) = Some(options.clone());

        let delay = *lock(&self.delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.next_response()
    }
}

/// Token provider with a fixed answer
pub struct MockTokenProvider {
    token: String,
    failure: Mutex<Option<TokenError>>,
    calls: AtomicUsize,
}

impl MockTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            failure: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_failure(&self, failure: Option<TokenError>) {
        *lock(&self.failure) = failure;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockTokenProvider {
    fn default() -> Self {
        Self::new("mock-access-token")
    }
}

#[async_trait]
impl TokenProvider for MockTokenProvider {
    async fn get_token(&self) -> Result<String, TokenError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match lock(&self.failure).clone() {
            Some(err) => Err(err),
            None => Ok(self.token.clone()),
        }
    }
}
