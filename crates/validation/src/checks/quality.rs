//! Check 6: data quality (advisory only)

use ekyc_core::{CheckKind, IssueCode, ParsedResult, Sex, ValidationIssue};

use super::CheckContext;

pub fn check_data_quality(result: &ParsedResult, _ctx: &CheckContext<'_>) -> Vec<ValidationIssue> {
    let warn = |code, message: String| {
        ValidationIssue::warning(CheckKind::DataQuality, code, message)
    };

    let mut issues: Vec<ValidationIssue> = result
        .evidence
        .missing()
        .into_iter()
        .map(|slot| warn(IssueCode::EvidenceMissing, format!("Missing evidence image: {slot}")))
        .collect();

    let ocr_sex = result
        .document_fields
        .as_ref()
        .and_then(|f| f.sex.as_deref())
        .and_then(Sex::normalize);
    let face_gender = result
        .face_liveness
        .as_ref()
        .and_then(|f| f.gender.as_deref())
        .and_then(Sex::normalize);

    if let (Some(ocr), Some(face)) = (ocr_sex, face_gender) {
        if ocr != face {
            issues.push(warn(
                IssueCode::SexMismatch,
                format!("Document sex ({ocr}) differs from detected gender ({face})"),
            ));
        }
    }

    issues
}
