//! Checks 3-5: face match, liveness, mask

use ekyc_core::{CheckKind, IssueCode, MatchVerdict, ParsedResult, ValidationIssue};

use super::{is_below, is_within, CheckContext};

pub fn check_face_match(result: &ParsedResult, ctx: &CheckContext<'_>) -> Vec<ValidationIssue> {
    let block = |code, message: String| {
        ValidationIssue::blocking(CheckKind::FaceMatch, code, message)
    };

    let Some(face_match) = result.face_match.as_ref() else {
        return vec![block(
            IssueCode::FaceMatchMissing,
            "Face comparison result is missing".to_string(),
        )];
    };

    let mut issues = Vec::new();
    let min = ctx.config.min_face_similarity;

    if face_match.verdict == MatchVerdict::NoMatch {
        issues.push(block(
            IssueCode::FaceMismatch,
            "Face does not match the document portrait".to_string(),
        ));
    }

    match face_match.similarity {
        Some(score) if score.is_finite() && score >= min => {}
        Some(score) => issues.push(block(
            IssueCode::FaceSimilarityLow,
            format!("Face similarity {score} is below the required {min}"),
        )),
        None => issues.push(block(
            IssueCode::FaceSimilarityLow,
            "Face similarity score is missing".to_string(),
        )),
    }

    if face_match.multiple_faces {
        issues.push(block(
            IssueCode::MultipleFacesCompared,
            "Multiple faces found during face comparison".to_string(),
        ));
    }

    issues
}

pub fn check_liveness(result: &ParsedResult, ctx: &CheckContext<'_>) -> Vec<ValidationIssue> {
    let block = |code, message: String| {
        ValidationIssue::blocking(CheckKind::Liveness, code, message)
    };

    let Some(face) = result.face_liveness.as_ref() else {
        return vec![block(
            IssueCode::FaceLivenessMissing,
            "Face liveness result is missing".to_string(),
        )];
    };

    let mut issues = Vec::new();

    if !face.is_live() {
        let status = face.liveness.as_deref().unwrap_or("missing");
        issues.push(block(
            IssueCode::FaceLivenessFailed,
            format!("Face liveness check failed: {status}"),
        ));
    }

    if face.eyes_open != Some(true) {
        issues.push(block(
            IssueCode::EyesClosed,
            "Eyes must be open during the selfie".to_string(),
        ));
    }

    if let Some(blur) = face.blur_score {
        if !is_below(blur, ctx.config.max_blur_score) {
            issues.push(block(
                IssueCode::FaceBlurred,
                format!(
                    "Face image is blurred (score {blur}, limit {})",
                    ctx.config.max_blur_score
                ),
            ));
        }
    }

    if let Some(age) = face.age {
        if !is_within(age, ctx.config.min_age, ctx.config.max_age) {
            issues.push(block(
                IssueCode::AgeOutOfRange,
                format!(
                    "Estimated age {age} is outside {}..={}",
                    ctx.config.min_age, ctx.config.max_age
                ),
            ));
        }
    }

    if face.multiple_faces {
        issues.push(block(
            IssueCode::MultipleFacesDetected,
            "Multiple faces detected in the selfie".to_string(),
        ));
    }

    issues
}

pub fn check_mask(result: &ParsedResult, _ctx: &CheckContext<'_>) -> Vec<ValidationIssue> {
    if result.masked == Some(true) {
        return vec![ValidationIssue::blocking(
            CheckKind::NoMask,
            IssueCode::MaskDetected,
            "A face mask was detected",
        )];
    }
    Vec::new()
}
