//! The six independent checks
//!
//! Each check looks at its own part of the [`ParsedResult`] and returns the
//! findings it raised. Checks never see each other's findings.

mod authenticity;
mod face;
mod ocr;
mod quality;

use chrono::NaiveDate;
use ekyc_core::{CheckKind, ParsedResult, ValidationIssue};
use regex::Regex;

use crate::config::ValidationConfig;

pub use ocr::DATE_FORMAT;

/// Inputs shared by every check
pub struct CheckContext<'a> {
    pub config: &'a ValidationConfig,
    pub id_pattern: &'a Regex,
    pub date_pattern: &'a Regex,
    pub today: NaiveDate,
}

/// A score passes only when it is a real number strictly below `limit`
pub(crate) fn is_below(value: f64, limit: f64) -> bool {
    value.is_finite() && value < limit
}

/// A score passes only when it is a real number inside `min..=max`
pub(crate) fn is_within(value: f64, min: f64, max: f64) -> bool {
    value.is_finite() && (min..=max).contains(&value)
}

type CheckFn = fn(&ParsedResult, &CheckContext<'_>) -> Vec<ValidationIssue>;

/// Checks in report order
pub const CHECKS: [(CheckKind, CheckFn); 6] = [
    (CheckKind::OcrValidity, ocr::check_ocr),
    (CheckKind::DocumentAuthenticity, authenticity::check_authenticity),
    (CheckKind::FaceMatch, face::check_face_match),
    (CheckKind::Liveness, face::check_liveness),
    (CheckKind::NoMask, face::check_mask),
    (CheckKind::DataQuality, quality::check_data_quality),
];
