//! eKYC Validation Engine
//!
//! Pure scoring of a [`ekyc_core::ParsedResult`] into a
//! [`ekyc_core::ValidationReport`].
//!
//! ## Checks
//!
//! | # | Check | Blocking |
//! |---|-------|----------|
//! | 1 | OCR validity (fields, id, dates, type, expiry) | yes, confidence is a warning |
//! | 2 | Document authenticity (both card sides) | yes |
//! | 3 | Face match (similarity >= 90) | yes |
//! | 4 | Liveness (status, eyes, blur, age) | yes |
//! | 5 | No mask | yes |
//! | 6 | Data quality (evidence, sex vs gender) | no |

pub mod checks;
pub mod config;
pub mod engine;
pub mod error;

pub use checks::DATE_FORMAT;
pub use config::ValidationConfig;
pub use engine::ValidationEngine;
pub use error::{ValidationError, ValidationResult};
