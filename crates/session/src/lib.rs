//! eKYC Session - capture session controller
//!
//! The controller owns one verification session and moves it through
//! `IDLE → CAPTURING → PROCESSING → COMPLETED | ERROR`. Every capture runs
//! the device, parses the blob and validates the result; failures are
//! classified and counted against the retry budget.
//!
//! # Example
//!
//! ```ignore
//! let controller = CaptureSessionController::new(device, tokens, engine, SessionConfig::default());
//! controller.initialize().await?;
//!
//! match controller.start_capture(CaptureKind::Full).await {
//!     Ok(CaptureOutcome::Completed(verified)) => submit(*verified).await?,
//!     Ok(_) => {}
//!     Err(err) => show(ekyc_core::present(&err)),
//! }
//! ```

pub mod config;
pub mod controller;
pub mod device;
pub mod mock;
pub mod state;

pub use config::SessionConfig;
pub use controller::{CaptureOutcome, CaptureSessionController};
pub use device::{
    CaptureDevice, CaptureKind, CaptureOptions, DeviceError, RawBlob, TokenError, TokenProvider,
};
pub use mock::{MockCaptureDevice, MockTokenProvider};
pub use state::{
    AttemptState, CaptureStep, SessionHandle, SessionIdentity, SessionSnapshot, StepReceiver,
    VerificationSession,
};
