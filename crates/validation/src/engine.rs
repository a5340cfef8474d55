//! Validation Engine - scores a parsed capture result
//!
//! ```text
//! ParsedResult ──► OCR ─────────────┐
//!              ──► authenticity ────┤
//!              ──► face match ──────┤
//!              ──► liveness ────────┼──► ValidationReport
//!              ──► no mask ─────────┤      is_valid = errors.is_empty()
//!              ──► data quality ────┘
//! ```
//!
//! The engine is pure: it reads nothing but its arguments, and the date used
//! for expiry checks is passed in.

use std::sync::OnceLock;

use chrono::{Local, NaiveDate};
use ekyc_core::{CheckKind, CheckSummary, ParsedResult, ValidationReport};
use regex::Regex;

use crate::checks::{CheckContext, CHECKS};
use crate::config::ValidationConfig;
use crate::error::{ValidationError, ValidationResult};

const DATE_PATTERN: &str = r"^\d{2}/\d{2}/\d{4}$";

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(DATE_PATTERN).expect("invalid regex"))
}

/// Main Validation Engine
#[derive(Debug, Clone)]
pub struct ValidationEngine {
    config: ValidationConfig,
    id_pattern: Regex,
}

impl ValidationEngine {
    /// Create an engine, rejecting invalid thresholds or patterns
    pub fn new(config: ValidationConfig) -> ValidationResult<Self> {
        config.check()?;
        let id_pattern = Regex::new(&config.id_pattern).map_err(|source| {
            ValidationError::InvalidPattern {
                field: "id_pattern",
                source,
            }
        })?;

        Ok(Self { config, id_pattern })
    }

    /// Create an engine with default thresholds
    pub fn with_defaults() -> ValidationResult<Self> {
        Self::new(ValidationConfig::default())
    }

    /// Get the current configuration
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Run all six checks against `result` as of `today`
    pub fn validate(&self, result: &ParsedResult, today: NaiveDate) -> ValidationReport {
        let ctx = CheckContext {
            config: &self.config,
            id_pattern: &self.id_pattern,
            date_pattern: date_pattern(),
            today,
        };

        let mut issues = Vec::new();
        let mut summary = CheckSummary::default();

        for (kind, check) in CHECKS {
            let found = check(result, &ctx);
            let passed = match kind {
                // Advisory check: passes when it has nothing to say
                CheckKind::DataQuality => found.is_empty(),
                _ => !found.iter().any(|issue| issue.is_blocking()),
            };
            set_passed(&mut summary, kind, passed);
            issues.extend(found);
        }

        let report = ValidationReport::from_issues(issues, summary);

        tracing::debug!(
            is_valid = report.is_valid(),
            errors = report.errors().len(),
            warnings = report.warnings().len(),
            "Validated capture result"
        );

        report
    }

    /// Validate against the local calendar date
    pub fn validate_now(&self, result: &ParsedResult) -> ValidationReport {
        self.validate(result, Local::now().date_naive())
    }
}

fn set_passed(summary: &mut CheckSummary, kind: CheckKind, passed: bool) {
    let slot = match kind {
        CheckKind::OcrValidity => &mut summary.ocr_valid,
        CheckKind::DocumentAuthenticity => &mut summary.document_authentic,
        CheckKind::FaceMatch => &mut summary.face_match,
        CheckKind::Liveness => &mut summary.person_real,
        CheckKind::NoMask => &mut summary.no_mask,
        CheckKind::DataQuality => &mut summary.data_quality,
    };
    *slot = passed;
}

#[cfg(test)]
mod tests {
    use super::*;
    use ekyc_core::{
        CardAuthenticity, DocumentFields, EvidencePaths, FaceLiveness, FaceMatch, IssueCode,
        MatchVerdict,
    };

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn genuine_card() -> CardAuthenticity {
        CardAuthenticity {
            liveness: Some("success".to_string()),
            fake_liveness_prob: Some(0.01),
            face_swap_prob: Some(0.01),
            ..Default::default()
        }
    }

    fn good_result() -> ParsedResult {
        ParsedResult {
            document_fields: Some(DocumentFields {
                id: Some("001099012345".to_string()),
                name: Some("NGUYEN VAN A".to_string()),
                date_of_birth: Some("01/02/1999".to_string()),
                issue_date: Some("10/10/2021".to_string()),
                expiry_date: Some("01/02/2039".to_string()),
                sex: Some("Nam".to_string()),
                nationality: Some("Việt Nam".to_string()),
                origin_address: Some("Hà Nội".to_string()),
                current_address: Some("Hoàn Kiếm, Hà Nội".to_string()),
                document_type: Some("CCCD".to_string()),
                ..Default::default()
            }),
            front_authenticity: Some(genuine_card()),
            back_authenticity: Some(genuine_card()),
            face_match: Some(FaceMatch {
                similarity: Some(95.0),
                verdict: MatchVerdict::Match,
                ..Default::default()
            }),
            face_liveness: Some(FaceLiveness {
                liveness: Some("success".to_string()),
                age: Some(27.0),
                gender: Some("male".to_string()),
                blur_score: Some(0.1),
                eyes_open: Some(true),
                ..Default::default()
            }),
            masked: Some(false),
            evidence: EvidencePaths {
                front: Some("front.jpg".to_string()),
                back: Some("back.jpg".to_string()),
                near_face: Some("near.jpg".to_string()),
                far_face: Some("far.jpg".to_string()),
            },
            ..Default::default()
        }
    }

    fn engine() -> ValidationEngine {
        ValidationEngine::with_defaults().unwrap()
    }

    #[test]
    fn test_good_result_is_valid() {
        let report = engine().validate(&good_result(), today());

        assert!(report.is_valid());
        assert!(report.errors().is_empty());
        assert!(report.warnings().is_empty());
        let checks = report.checks();
        assert!(checks.ocr_valid);
        assert!(checks.document_authentic);
        assert!(checks.face_match);
        assert!(checks.person_real);
        assert!(checks.no_mask);
        assert!(checks.data_quality);
    }

    #[test]
    fn test_missing_fields_block() {
        let mut result = good_result();
        if let Some(fields) = result.document_fields.as_mut() {
            fields.nationality = None;
            fields.name = Some("  ".to_string());
        }

        let report = engine().validate(&result, today());
        assert!(!report.is_valid());
        assert!(!report.checks().ocr_valid);
        let missing: Vec<_> = report
            .errors()
            .iter()
            .filter(|e| e.code == IssueCode::OcrFieldMissing)
            .collect();
        assert_eq!(missing.len(), 2);
    }

    #[test]
    fn test_no_ocr_at_all() {
        let mut result = good_result();
        result.document_fields = None;
        result.ocr_errors = vec!["Card cut off".to_string()];

        let report = engine().validate(&result, today());
        assert!(report.has_error(IssueCode::OcrMissing));
        assert!(report.errors()[0].message.contains("Card cut off"));
    }

    #[test]
    fn test_invalid_id_format() {
        let mut result = good_result();
        if let Some(fields) = result.document_fields.as_mut() {
            fields.id = Some("12345".to_string());
        }
        let report = engine().validate(&result, today());
        assert!(report.has_error(IssueCode::InvalidIdFormat));
    }

    #[test]
    fn test_date_format_and_calendar() {
        let mut result = good_result();
        if let Some(fields) = result.document_fields.as_mut() {
            fields.date_of_birth = Some("1999-02-01".to_string());
            fields.issue_date = Some("31/02/2021".to_string());
        }
        let report = engine().validate(&result, today());
        assert!(report.has_error(IssueCode::InvalidDateFormat));
        assert!(report.has_error(IssueCode::InvalidDate));
    }

    #[test]
    fn test_expired_document() {
        let mut result = good_result();
        if let Some(fields) = result.document_fields.as_mut() {
            fields.expiry_date = Some("17/10/2026".to_string());
        }
        let report = engine().validate(&result, today());
        assert!(report.has_error(IssueCode::DocumentExpired));

        // Expiring today is still valid
        if let Some(fields) = result.document_fields.as_mut() {
            fields.expiry_date = Some("18/10/2026".to_string());
        }
        let report = engine().validate(&result, today());
        assert!(report.is_valid());
    }

    #[test]
    fn test_unsupported_document_type() {
        let mut result = good_result();
        if let Some(fields) = result.document_fields.as_mut() {
            fields.document_type = Some("PASSPORT".to_string());
        }
        let report = engine().validate(&result, today());
        assert!(report.has_error(IssueCode::UnsupportedDocumentType));
    }

    #[test]
    fn test_low_confidence_is_warning_only() {
        let mut result = good_result();
        if let Some(fields) = result.document_fields.as_mut() {
            fields.confidence.insert("name".to_string(), 0.5);
            fields.confidence.insert("id".to_string(), 0.95);
        }
        let report = engine().validate(&result, today());
        assert!(report.is_valid());
        assert!(report.checks().ocr_valid);
        assert_eq!(report.warnings().len(), 1);
        assert!(report.has_warning(IssueCode::LowFieldConfidence));
    }

    #[test]
    fn test_card_flags_block() {
        let mut result = good_result();
        result.front_authenticity = Some(CardAuthenticity {
            fake_print_photo: true,
            ..genuine_card()
        });
        result.back_authenticity = Some(CardAuthenticity {
            face_swapping: true,
            ..genuine_card()
        });

        let report = engine().validate(&result, today());
        assert!(report.has_error(IssueCode::PrintedPhoto));
        assert!(report.has_error(IssueCode::FaceSwap));
        assert!(!report.checks().document_authentic);
    }

    #[test]
    fn test_card_probability_thresholds() {
        let mut result = good_result();
        result.front_authenticity = Some(CardAuthenticity {
            fake_liveness_prob: Some(0.3),
            ..genuine_card()
        });
        result.back_authenticity = Some(CardAuthenticity {
            face_swap_prob: Some(0.19),
            ..genuine_card()
        });

        let report = engine().validate(&result, today());
        assert!(report.has_error(IssueCode::FakeLivenessProbability));
        assert!(!report.has_error(IssueCode::FaceSwapProbability));
    }

    #[test]
    fn test_missing_back_card() {
        let mut result = good_result();
        result.back_authenticity = None;
        let report = engine().validate(&result, today());
        assert!(report.has_error(IssueCode::CardLivenessMissing));
    }

    #[test]
    fn test_similarity_boundary() {
        let mut result = good_result();
        if let Some(fm) = result.face_match.as_mut() {
            fm.similarity = Some(90.0);
        }
        assert!(engine().validate(&result, today()).is_valid());

        if let Some(fm) = result.face_match.as_mut() {
            fm.similarity = Some(89.99);
        }
        let report = engine().validate(&result, today());
        assert!(!report.is_valid());
        assert!(report.errors()[0].message.contains("89.99"));
    }

    #[test]
    fn test_no_match_blocks_regardless_of_score() {
        let mut result = good_result();
        if let Some(fm) = result.face_match.as_mut() {
            fm.similarity = Some(99.0);
            fm.verdict = MatchVerdict::NoMatch;
        }
        let report = engine().validate(&result, today());
        assert!(report.has_error(IssueCode::FaceMismatch));
    }

    #[test]
    fn test_liveness_failures() {
        let mut result = good_result();
        result.face_liveness = Some(FaceLiveness {
            liveness: Some("failure".to_string()),
            age: Some(12.0),
            blur_score: Some(0.9),
            eyes_open: Some(false),
            multiple_faces: true,
            ..Default::default()
        });

        let report = engine().validate(&result, today());
        for code in [
            IssueCode::FaceLivenessFailed,
            IssueCode::EyesClosed,
            IssueCode::FaceBlurred,
            IssueCode::AgeOutOfRange,
            IssueCode::MultipleFacesDetected,
        ] {
            assert!(report.has_error(code), "expected {code}");
        }
        assert!(!report.checks().person_real);
    }

    #[test]
    fn test_age_bounds_are_inclusive() {
        for age in [16.0, 150.0] {
            let mut result = good_result();
            if let Some(face) = result.face_liveness.as_mut() {
                face.age = Some(age);
            }
            assert!(engine().validate(&result, today()).is_valid(), "age {age}");
        }

        for age in [15.9, 150.5] {
            let mut result = good_result();
            if let Some(face) = result.face_liveness.as_mut() {
                face.age = Some(age);
            }
            let report = engine().validate(&result, today());
            assert!(report.has_error(IssueCode::AgeOutOfRange), "age {age}");
        }
    }

    #[test]
    fn test_limits_reached_exactly_block() {
        let mut result = good_result();
        if let Some(face) = result.face_liveness.as_mut() {
            face.blur_score = Some(0.5);
        }
        result.back_authenticity = Some(CardAuthenticity {
            face_swap_prob: Some(0.2),
            ..genuine_card()
        });

        let report = engine().validate(&result, today());
        assert!(report.has_error(IssueCode::FaceBlurred));
        assert!(report.has_error(IssueCode::FaceSwapProbability));
        assert!(!report.checks().person_real);
        assert!(!report.checks().document_authentic);

        if let Some(face) = result.face_liveness.as_mut() {
            face.blur_score = Some(0.49);
        }
        result.back_authenticity = Some(genuine_card());
        assert!(engine().validate(&result, today()).is_valid());
    }

    #[test]
    fn test_nan_scores_block() {
        let mut result = good_result();
        result.front_authenticity = Some(CardAuthenticity {
            fake_liveness_prob: Some(f64::NAN),
            face_swap_prob: Some(f64::NAN),
            ..genuine_card()
        });
        if let Some(face) = result.face_liveness.as_mut() {
            face.age = Some(f64::NAN);
            face.blur_score = Some(f64::NAN);
        }
        if let Some(fm) = result.face_match.as_mut() {
            fm.similarity = Some(f64::NAN);
        }

        let report = engine().validate(&result, today());
        for code in [
            IssueCode::FakeLivenessProbability,
            IssueCode::FaceSwapProbability,
            IssueCode::AgeOutOfRange,
            IssueCode::FaceBlurred,
            IssueCode::FaceSimilarityLow,
        ] {
            assert!(report.has_error(code), "expected {code}");
        }
        assert!(!report.is_valid());
    }

    #[test]
    fn test_nan_confidence_warns() {
        let mut result = good_result();
        if let Some(fields) = result.document_fields.as_mut() {
            fields.confidence.insert("id".to_string(), f64::NAN);
        }
        let report = engine().validate(&result, today());
        assert!(report.has_warning(IssueCode::LowFieldConfidence));
    }

    #[test]
    fn test_mask_detected() {
        let mut result = good_result();
        result.masked = Some(true);
        let report = engine().validate(&result, today());
        assert!(report.has_error(IssueCode::MaskDetected));
        assert!(!report.checks().no_mask);
    }

    #[test]
    fn test_data_quality_is_advisory() {
        let mut result = good_result();
        result.evidence.far_face = None;
        if let Some(face) = result.face_liveness.as_mut() {
            face.gender = Some("female".to_string());
        }

        let report = engine().validate(&result, today());
        assert!(report.is_valid());
        assert!(!report.checks().data_quality);
        assert!(report.has_warning(IssueCode::EvidenceMissing));
        assert!(report.has_warning(IssueCode::SexMismatch));
    }

    #[test]
    fn test_invalid_id_pattern_rejected() {
        let config = ValidationConfig {
            id_pattern: "([".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            ValidationEngine::new(config),
            Err(ValidationError::InvalidPattern { .. })
        ));
    }
}
