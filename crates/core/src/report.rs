//! Validation report types
//!
//! Findings are structured: each [`ValidationIssue`] carries an
//! [`IssueCode`], its [`Severity`] and the check that raised it. Severity is
//! decided where the finding is produced, so callers never need to scan
//! message text to decide whether an issue blocks navigation.
//!
//! Issue families are ordered by how strongly they indicate fraud:
//! `Other < OcrIncomplete < ExpiredDocument < FaceMismatch < Spoof < FakeDocument`

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::result::ParsedResult;

/// The six independent validation checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CheckKind {
    OcrValidity,
    DocumentAuthenticity,
    FaceMatch,
    Liveness,
    NoMask,
    DataQuality,
}

/// Whether a finding blocks the verification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Blocking,
    Warning,
}

/// Machine-readable code of a validation finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    // OCR
    OcrMissing,
    OcrFieldMissing,
    InvalidIdFormat,
    InvalidDateFormat,
    InvalidDate,
    UnsupportedDocumentType,
    DocumentExpired,
    LowFieldConfidence,

    // Document authenticity
    CardLivenessMissing,
    CardLivenessFailed,
    FakeDocument,
    PrintedPhoto,
    FaceSwap,
    FakeLivenessProbability,
    FaceSwapProbability,

    // Face match
    FaceMatchMissing,
    FaceMismatch,
    FaceSimilarityLow,
    MultipleFacesCompared,

    // Liveness
    FaceLivenessMissing,
    FaceLivenessFailed,
    EyesClosed,
    FaceBlurred,
    AgeOutOfRange,
    MultipleFacesDetected,

    // Mask
    MaskDetected,

    // Data quality
    EvidenceMissing,
    SexMismatch,
}

/// Coarse grouping of issue codes used to choose user guidance
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum IssueFamily {
    Other = 0,
    OcrIncomplete = 1,
    ExpiredDocument = 2,
    FaceMismatch = 3,
    Spoof = 4,
    FakeDocument = 5,
}

impl IssueCode {
    pub fn family(&self) -> IssueFamily {
        match self {
            IssueCode::OcrMissing
            | IssueCode::OcrFieldMissing
            | IssueCode::InvalidIdFormat
            | IssueCode::InvalidDateFormat
            | IssueCode::InvalidDate
            | IssueCode::UnsupportedDocumentType
            | IssueCode::LowFieldConfidence => IssueFamily::OcrIncomplete,

            IssueCode::DocumentExpired => IssueFamily::ExpiredDocument,

            IssueCode::FakeDocument
            | IssueCode::PrintedPhoto
            | IssueCode::FaceSwap
            | IssueCode::FakeLivenessProbability
            | IssueCode::FaceSwapProbability
            | IssueCode::CardLivenessFailed => IssueFamily::FakeDocument,

            IssueCode::FaceMismatch
            | IssueCode::FaceSimilarityLow
            | IssueCode::MultipleFacesCompared => IssueFamily::FaceMismatch,

            IssueCode::FaceLivenessFailed | IssueCode::MaskDetected => IssueFamily::Spoof,

            IssueCode::CardLivenessMissing
            | IssueCode::FaceMatchMissing
            | IssueCode::FaceLivenessMissing
            | IssueCode::EyesClosed
            | IssueCode::FaceBlurred
            | IssueCode::AgeOutOfRange
            | IssueCode::MultipleFacesDetected
            | IssueCode::EvidenceMissing
            | IssueCode::SexMismatch => IssueFamily::Other,
        }
    }
}

/// A single validation finding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub check: CheckKind,
    pub code: IssueCode,
    pub severity: Severity,
    pub message: String,
}

impl ValidationIssue {
    pub fn blocking(check: CheckKind, code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            check,
            code,
            severity: Severity::Blocking,
            message: message.into(),
        }
    }

    pub fn warning(check: CheckKind, code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            check,
            code,
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn is_blocking(&self) -> bool {
        self.severity == Severity::Blocking
    }
}

/// Pass/fail of each of the six checks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckSummary {
    pub ocr_valid: bool,
    pub document_authentic: bool,
    pub face_match: bool,
    pub person_real: bool,
    pub no_mask: bool,
    pub data_quality: bool,
}

impl CheckSummary {
    pub fn passed(&self, check: CheckKind) -> bool {
        match check {
            CheckKind::OcrValidity => self.ocr_valid,
            CheckKind::DocumentAuthenticity => self.document_authentic,
            CheckKind::FaceMatch => self.face_match,
            CheckKind::Liveness => self.person_real,
            CheckKind::NoMask => self.no_mask,
            CheckKind::DataQuality => self.data_quality,
        }
    }
}

/// Outcome of validating one [`ParsedResult`]
///
/// Built once from the findings of all six checks and never mutated after.
/// Fields are private; the only constructor derives `is_valid` from the
/// blocking findings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    is_valid: bool,
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
    checks: CheckSummary,
}

impl ValidationReport {
    /// Assemble a report from raw findings, in the order they were produced
    pub fn from_issues(issues: Vec<ValidationIssue>, checks: CheckSummary) -> Self {
        let (errors, warnings): (Vec<_>, Vec<_>) =
            issues.into_iter().partition(ValidationIssue::is_blocking);

        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
            checks,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn errors(&self) -> &[ValidationIssue] {
        &self.errors
    }

    pub fn warnings(&self) -> &[ValidationIssue] {
        &self.warnings
    }

    pub fn checks(&self) -> &CheckSummary {
        &self.checks
    }

    /// Blocking error messages, in order
    pub fn error_messages(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.message.as_str()).collect()
    }

    pub fn has_error(&self, code: IssueCode) -> bool {
        self.errors.iter().any(|e| e.code == code)
    }

    pub fn has_warning(&self, code: IssueCode) -> bool {
        self.warnings.iter().any(|w| w.code == code)
    }

    /// Most severe family among the blocking errors
    pub fn dominant_family(&self) -> Option<IssueFamily> {
        self.errors.iter().map(|e| e.code.family()).max()
    }
}

/// A parsed result together with the report that scored it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifiedCapture {
    pub result: ParsedResult,
    pub report: ValidationReport,
}

impl VerifiedCapture {
    pub fn new(result: ParsedResult, report: ValidationReport) -> Self {
        Self { result, report }
    }
}
