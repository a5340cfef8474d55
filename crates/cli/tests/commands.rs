//! Command tests against blob and config files on disk

use chrono::NaiveDate;
use ekyc_cli::commands::{self, SimulateOptions};
use ekyc_cli::{AppContext, EkycConfig};
use ekyc_core::{ErrorCode, EvidenceSlot, UserAction};
use ekyc_session::CaptureStep;
use ekyc_submission::SubmissionStatus;
use serde_json::{json, Value};
use std::io::Write;
use tempfile::NamedTempFile;

fn encoded(value: Value) -> Value {
    Value::String(value.to_string())
}

fn blob(similarity: f64) -> String {
    let card = json!({ "object": { "liveness": "success" } });
    json!({
        "INFO_RESULT": encoded(json!({ "object": {
            "id": "001099012345",
            "name": "NGUYEN VAN A",
            "birth_day": "01/01/1999",
            "issue_date": "10/05/2021",
            "valid_date": "01/01/2049",
            "gender": "Nam",
            "nationality": "Việt Nam",
            "origin_location": "Hà Nội",
            "recent_location": "Hà Nội",
            "card_type": "CCCD"
        }})),
        "LIVENESS_CARD_FRONT_RESULT": encoded(card.clone()),
        "LIVENESS_CARD_REAR_RESULT": encoded(card),
        "COMPARE_RESULT": encoded(json!({ "object": { "msg": "MATCH", "prob": similarity } })),
        "LIVENESS_FACE_RESULT": encoded(json!({ "object": {
            "liveness": "success",
            "age": 27,
            "is_eye_open": "yes"
        }})),
        "MASKED_FACE_RESULT": encoded(json!({ "object": { "masked": "no" } })),
        "FRONT_IMAGE": "/c/front.jpg",
        "REAR_IMAGE": "/c/rear.jpg",
        "PORTRAIT_NEAR_IMAGE": "/c/near.jpg",
        "PORTRAIT_FAR_IMAGE": "/c/far.jpg"
    })
    .to_string()
}

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_read_blob_and_parse() {
    let file = write_temp(&blob(95.0));
    let raw = commands::read_blob(file.path()).unwrap();

    let result = commands::parse(&raw).unwrap();
    assert!(result.is_content_bearing());
    assert_eq!(result.evidence.missing().len(), 0);
}

#[test]
fn test_parse_rejects_non_object() {
    assert!(commands::parse("[1, 2, 3]").is_err());
}

#[test]
fn test_validate_with_fixed_date() {
    let ctx = AppContext::load(None).unwrap();
    let today = NaiveDate::from_ymd_opt(2026, 10, 18);

    assert!(commands::validate(&ctx, &blob(95.0), today).unwrap().is_valid());
    assert!(!commands::validate(&ctx, &blob(85.0), today).unwrap().is_valid());
}

#[test]
fn test_config_file_overrides_threshold() {
    let file = write_temp(r#"{ "validation": { "min_face_similarity": 80.0 } }"#);
    let ctx = AppContext::load(Some(file.path())).unwrap();

    assert_eq!(ctx.config.validation.min_face_similarity, 80.0);
    assert_eq!(ctx.config.session.max_retries, 3);

    let today = NaiveDate::from_ymd_opt(2026, 10, 18);
    assert!(commands::validate(&ctx, &blob(85.0), today).unwrap().is_valid());
}

#[test]
fn test_config_file_with_bad_pattern_fails() {
    let file = write_temp(r#"{ "validation": { "id_pattern": "([0-9" } }"#);
    assert!(AppContext::load(Some(file.path())).is_err());
}

#[test]
fn test_default_config_round_trip() {
    let config = EkycConfig::default();
    let json = serde_json::to_string(&config).unwrap();
    let back: EkycConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(config, back);
}

#[tokio::test]
async fn test_simulate_submits_with_partial_uploads() {
    let ctx = AppContext::load(None).unwrap();
    let options = SimulateOptions {
        fail_uploads: vec![EvidenceSlot::BackCard, EvidenceSlot::NearFace],
        ..Default::default()
    };

    let report = commands::simulate(&ctx, &blob(95.0), options).await.unwrap();

    assert_eq!(report.session.current_step, CaptureStep::Completed);
    let receipt = report.submission.unwrap();
    assert_eq!(receipt.status, SubmissionStatus::Saved);
    assert_eq!(receipt.payload.file_id_count(), 2);
    assert!(report.error.is_none());
}

#[tokio::test]
async fn test_simulate_already_verified() {
    let ctx = AppContext::load(None).unwrap();
    let options = SimulateOptions {
        already_verified: true,
        ..Default::default()
    };

    let report = commands::simulate(&ctx, &blob(95.0), options).await.unwrap();
    assert_eq!(
        report.submission.unwrap().status,
        SubmissionStatus::AlreadyVerified
    );
}

#[tokio::test]
async fn test_simulate_rejected_capture_presents_retry() {
    let ctx = AppContext::load(None).unwrap();

    let report = commands::simulate(&ctx, &blob(85.0), SimulateOptions::default())
        .await
        .unwrap();

    assert_eq!(report.session.current_step, CaptureStep::Error);
    assert!(report.submission.is_none());
    assert_eq!(report.error.unwrap().code, ErrorCode::FaceMismatch);
    assert_eq!(report.presentation.unwrap().action, UserAction::RetryOrCancel);
}

#[tokio::test]
async fn test_simulate_blank_blob_is_cancellation() {
    let ctx = AppContext::load(None).unwrap();

    let report = commands::simulate(&ctx, "", SimulateOptions::default())
        .await
        .unwrap();

    assert_eq!(report.error.unwrap().code, ErrorCode::UserCancelled);
    assert_eq!(report.presentation.unwrap().action, UserAction::Dismiss);
}
