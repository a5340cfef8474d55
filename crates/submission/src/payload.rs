//! Submission payload assembly
//!
//! Scores are clamped into `[0, 1]`; face similarity arrives on a 0–100
//! scale and is divided by 100 first. Fields the user confirmed on the
//! review screen override the OCR values.

use crate::evidence::EvidenceUploads;
use chrono::{DateTime, Utc};
use ekyc_core::{EvidenceSlot, ParsedResult, VerifiedCapture};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fields the user confirmed or corrected before submitting
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplementaryFields {
    pub full_name: Option<String>,
    pub id_number: Option<String>,
    pub date_of_birth: Option<String>,
    pub sex: Option<String>,
    pub issue_date: Option<String>,
    pub issue_place: Option<String>,
    pub current_address: Option<String>,
    pub origin_address: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Everything the submitter needs besides the verified capture
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRequest {
    pub session_id: Option<Uuid>,
    pub supplementary: SupplementaryFields,
}

/// Record sent to the persistence API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub session_id: Option<Uuid>,

    // Identity
    pub id_number: Option<String>,
    pub full_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub sex: Option<String>,
    pub nationality: Option<String>,
    pub issue_date: Option<String>,
    pub issue_place: Option<String>,
    pub expiry_date: Option<String>,
    pub document_type: Option<String>,
    pub current_address: Option<String>,
    pub origin_address: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,

    // Verification scores, all in [0, 1]
    pub face_similarity: f64,
    pub front_fake_liveness_prob: f64,
    pub back_fake_liveness_prob: f64,
    pub front_face_swap_prob: f64,
    pub back_face_swap_prob: f64,
    pub blur_score: f64,
    pub age: f64,

    // Verification flags
    pub face_matched: bool,
    pub front_card_live: bool,
    pub back_card_live: bool,
    pub face_live: bool,
    pub eyes_open: bool,
    pub masked: bool,
    pub validation_passed: bool,

    // Evidence
    pub front_image_id: Option<String>,
    pub back_image_id: Option<String>,
    pub near_face_image_id: Option<String>,
    pub far_face_image_id: Option<String>,

    pub submitted_at: DateTime<Utc>,
}

/// Clamp a score into `[0, 1]`; missing or NaN becomes 0
pub fn clamp_unit(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() => v.clamp(0.0, 1.0),
        Some(v) if v == f64::INFINITY => 1.0,
        _ => 0.0,
    }
}

/// Clamp a non-negative quantity; missing or NaN becomes 0
pub fn clamp_non_negative(value: Option<f64>) -> f64 {
    match value {
        Some(v) if !v.is_nan() => v.max(0.0),
        _ => 0.0,
    }
}

fn pick(confirmed: &Option<String>, ocr: Option<&String>) -> Option<String> {
    confirmed
        .as_ref()
        .filter(|s| !s.trim().is_empty())
        .or(ocr)
        .cloned()
}

impl SubmissionPayload {
    pub fn build(
        verified: &VerifiedCapture,
        request: &SubmissionRequest,
        uploads: &EvidenceUploads,
    ) -> Self {
        let result: &ParsedResult = &verified.result;
        let fields = result.document_fields.clone().unwrap_or_default();
        let confirmed = &request.supplementary;

        let front = result.front_authenticity.as_ref();
        let back = result.back_authenticity.as_ref();
        let face_match = result.face_match.as_ref();
        let liveness = result.face_liveness.as_ref();

        let similarity = face_match
            .and_then(|m| m.similarity)
            .map(|s| s / 100.0);

        let file_id = |slot| uploads.file_id(slot).map(str::to_string);

        Self {
            session_id: request.session_id,

            id_number: pick(&confirmed.id_number, fields.id.as_ref()),
            full_name: pick(&confirmed.full_name, fields.name.as_ref()),
            date_of_birth: pick(&confirmed.date_of_birth, fields.date_of_birth.as_ref()),
            sex: pick(&confirmed.sex, fields.sex.as_ref()),
            nationality: fields.nationality.clone(),
            issue_date: pick(&confirmed.issue_date, fields.issue_date.as_ref()),
            issue_place: confirmed.issue_place.clone(),
            expiry_date: fields.expiry_date.clone(),
            document_type: fields.document_type.clone(),
            current_address: pick(&confirmed.current_address, fields.current_address.as_ref()),
            origin_address: pick(&confirmed.origin_address, fields.origin_address.as_ref()),
            email: confirmed.email.clone(),
            phone: confirmed.phone.clone(),

            face_similarity: clamp_unit(similarity),
            front_fake_liveness_prob: clamp_unit(front.and_then(|c| c.fake_liveness_prob)),
            back_fake_liveness_prob: clamp_unit(back.and_then(|c| c.fake_liveness_prob)),
            front_face_swap_prob: clamp_unit(front.and_then(|c| c.face_swap_prob)),
            back_face_swap_prob: clamp_unit(back.and_then(|c| c.face_swap_prob)),
            blur_score: clamp_unit(liveness.and_then(|l| l.blur_score)),
            age: clamp_non_negative(liveness.and_then(|l| l.age)),

            face_matched: face_match.map(|m| m.is_match()).unwrap_or(false),
            front_card_live: front.map(|c| c.is_live()).unwrap_or(false),
            back_card_live: back.map(|c| c.is_live()).unwrap_or(false),
            face_live: liveness.map(|l| l.is_live()).unwrap_or(false),
            eyes_open: liveness.and_then(|l| l.eyes_open).unwrap_or(false),
            masked: result.masked.unwrap_or(false),
            validation_passed: verified.report.is_valid(),

            front_image_id: file_id(EvidenceSlot::FrontCard),
            back_image_id: file_id(EvidenceSlot::BackCard),
            near_face_image_id: file_id(EvidenceSlot::NearFace),
            far_face_image_id: file_id(EvidenceSlot::FarFace),

            submitted_at: Utc::now(),
        }
    }

    /// Number of evidence ids carried by the payload
    pub fn file_id_count(&self) -> usize {
        [
            &self.front_image_id,
            &self.back_image_id,
            &self.near_face_image_id,
            &self.far_face_image_id,
        ]
        .iter()
        .filter(|id| id.is_some())
        .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evidence::EvidenceUploadOutcome;
    use ekyc_core::{
        CardAuthenticity, CheckSummary, DocumentFields, FaceLiveness, FaceMatch, MatchVerdict,
        ValidationReport,
    };

    fn verified() -> VerifiedCapture {
        let card = CardAuthenticity {
            liveness: Some("success".to_string()),
            fake_liveness_prob: Some(1.7),
            face_swap_prob: Some(-0.2),
            ..Default::default()
        };
        let result = ParsedResult {
            document_fields: Some(DocumentFields {
                id: Some("001099012345".to_string()),
                name: Some("NGUYEN VAN A".to_string()),
                current_address: Some("Ha Noi".to_string()),
                ..Default::default()
            }),
            front_authenticity: Some(card.clone()),
            back_authenticity: Some(CardAuthenticity {
                liveness: Some("failure".to_string()),
                ..card
            }),
            face_match: Some(FaceMatch {
                similarity: Some(95.5),
                verdict: MatchVerdict::Match,
                ..Default::default()
            }),
            face_liveness: Some(FaceLiveness {
                liveness: Some("success".to_string()),
                age: Some(-3.0),
                blur_score: Some(f64::NAN),
                eyes_open: Some(true),
                ..Default::default()
            }),
            masked: Some(false),
            ..Default::default()
        };
        VerifiedCapture::new(
            result,
            ValidationReport::from_issues(vec![], CheckSummary::default()),
        )
    }

    #[test]
    fn test_clamp_helpers() {
        assert_eq!(clamp_unit(Some(0.4)), 0.4);
        assert_eq!(clamp_unit(Some(1.4)), 1.0);
        assert_eq!(clamp_unit(Some(-0.1)), 0.0);
        assert_eq!(clamp_unit(Some(f64::NAN)), 0.0);
        assert_eq!(clamp_unit(Some(f64::INFINITY)), 1.0);
        assert_eq!(clamp_unit(None), 0.0);

        assert_eq!(clamp_non_negative(Some(-1.0)), 0.0);
        assert_eq!(clamp_non_negative(Some(31.0)), 31.0);
    }

    #[test]
    fn test_build_clamps_and_derives_flags() {
        let payload = SubmissionPayload::build(
            &verified(),
            &SubmissionRequest::default(),
            &EvidenceUploads::new(),
        );

        assert!((payload.face_similarity - 0.955).abs() < 1e-9);
        assert_eq!(payload.front_fake_liveness_prob, 1.0);
        assert_eq!(payload.front_face_swap_prob, 0.0);
        assert_eq!(payload.blur_score, 0.0);
        assert_eq!(payload.age, 0.0);

        assert!(payload.face_matched);
        assert!(payload.front_card_live);
        assert!(!payload.back_card_live);
        assert!(payload.face_live);
        assert!(payload.eyes_open);
        assert!(!payload.masked);
        assert!(payload.validation_passed);
        assert_eq!(payload.file_id_count(), 0);
    }

    #[test]
    fn test_confirmed_fields_override_ocr() {
        let request = SubmissionRequest {
            session_id: None,
            supplementary: SupplementaryFields {
                full_name: Some("NGUYỄN VĂN A".to_string()),
                current_address: Some("   ".to_string()),
                phone: Some("0900000000".to_string()),
                ..Default::default()
            },
        };

        let payload = SubmissionPayload::build(&verified(), &request, &EvidenceUploads::new());

        assert_eq!(payload.full_name.as_deref(), Some("NGUYỄN VĂN A"));
        // blank confirmation falls back to OCR
        assert_eq!(payload.current_address.as_deref(), Some("Ha Noi"));
        assert_eq!(payload.id_number.as_deref(), Some("001099012345"));
        assert_eq!(payload.phone.as_deref(), Some("0900000000"));
    }

    #[test]
    fn test_build_carries_uploaded_ids() {
        let mut uploads = EvidenceUploads::new();
        uploads.record(
            EvidenceSlot::BackCard,
            EvidenceUploadOutcome::Uploaded {
                file_id: "file-2".to_string(),
            },
        );
        uploads.record(
            EvidenceSlot::NearFace,
            EvidenceUploadOutcome::Failed {
                reason: "rejected".to_string(),
            },
        );

        let payload = SubmissionPayload::build(&verified(), &SubmissionRequest::default(), &uploads);

        assert_eq!(payload.back_image_id.as_deref(), Some("file-2"));
        assert!(payload.near_face_image_id.is_none());
        assert_eq!(payload.file_id_count(), 1);
    }
}
