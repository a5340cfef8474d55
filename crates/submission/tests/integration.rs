//! Submission workflow against in-memory services

use ekyc_core::{
    CheckSummary, ErrorCode, ErrorType, EvidenceSlot, ValidationReport, VerifiedCapture,
};
use ekyc_parser::parse_capture;
use ekyc_submission::{
    EvidenceSubmitter, MockFileUploader, MockPersistenceApi, PersistenceError, SaveReceipt,
    SubmissionRequest, SubmissionStatus, SupplementaryFields, USER_ALREADY_VERIFIED,
};
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

fn encoded(value: Value) -> Value {
    Value::String(value.to_string())
}

fn verified_with_evidence(evidence: Value) -> VerifiedCapture {
    let mut blob = json!({
        "INFO_RESULT": encoded(json!({ "object": {
            "id": "001099012345",
            "name": "NGUYEN VAN A",
            "birth_day": "01/01/1999",
            "recent_location": "Hà Nội"
        }})),
        "LIVENESS_CARD_FRONT_RESULT": encoded(json!({ "object": { "liveness": "success" } })),
        "COMPARE_RESULT": encoded(json!({ "object": { "msg": "MATCH", "prob": 95.0 } })),
        "LIVENESS_FACE_RESULT": encoded(json!({ "object": { "liveness": "success", "age": 27 } })),
    });
    if let (Some(root), Value::Object(extra)) = (blob.as_object_mut(), evidence) {
        root.extend(extra);
    }

    let result = parse_capture(&blob.to_string()).unwrap();
    VerifiedCapture::new(
        result,
        ValidationReport::from_issues(vec![], CheckSummary::default()),
    )
}

fn all_evidence() -> Value {
    json!({
        "FRONT_IMAGE": "/c/front.jpg",
        "REAR_IMAGE": "/c/rear.jpg",
        "PORTRAIT_NEAR_IMAGE": "/c/near.jpg",
        "PORTRAIT_FAR_IMAGE": "/c/far.jpg"
    })
}

struct Fixture {
    uploader: Arc<MockFileUploader>,
    persistence: Arc<MockPersistenceApi>,
    submitter: EvidenceSubmitter,
}

fn fixture() -> Fixture {
    let uploader = Arc::new(MockFileUploader::new());
    let persistence = Arc::new(MockPersistenceApi::new());
    let submitter = EvidenceSubmitter::new(uploader.clone(), persistence.clone());
    Fixture {
        uploader,
        persistence,
        submitter,
    }
}

#[tokio::test]
async fn test_partial_uploads_submit_with_surviving_ids() {
    let fx = fixture();
    fx.uploader.fail_slot(EvidenceSlot::BackCard);
    fx.uploader.fail_slot(EvidenceSlot::NearFace);

    let receipt = fx
        .submitter
        .submit(&verified_with_evidence(all_evidence()), &SubmissionRequest::default())
        .await
        .unwrap();

    assert_eq!(receipt.status, SubmissionStatus::Saved);
    assert_eq!(receipt.uploads.uploaded_count(), 2);
    assert_eq!(receipt.payload.file_id_count(), 2);
    assert!(receipt.payload.front_image_id.is_some());
    assert!(receipt.payload.back_image_id.is_none());
    assert!(receipt.payload.near_face_image_id.is_none());
    assert!(receipt.payload.far_face_image_id.is_some());

    assert_eq!(fx.uploader.calls(), 4);
    assert_eq!(fx.persistence.saved().len(), 1);
}

#[tokio::test]
async fn test_all_uploads_failing_never_saves() {
    let fx = fixture();
    for slot in EvidenceSlot::ALL {
        fx.uploader.fail_slot(slot);
    }

    let err = fx
        .submitter
        .submit(&verified_with_evidence(all_evidence()), &SubmissionRequest::default())
        .await
        .unwrap_err();

    assert_eq!(err.error_type, ErrorType::Validation);
    assert_eq!(err.code, ErrorCode::NoEvidenceUploaded);
    assert_eq!(fx.uploader.calls(), 4);
    assert!(fx.persistence.saved().is_empty());
}

#[tokio::test]
async fn test_missing_paths_skip_upload_service() {
    let fx = fixture();
    let verified = verified_with_evidence(json!({ "FRONT_IMAGE": "/c/front.jpg" }));

    let receipt = fx
        .submitter
        .submit(&verified, &SubmissionRequest::default())
        .await
        .unwrap();

    assert_eq!(fx.uploader.calls(), 1);
    assert_eq!(receipt.uploads.uploaded_count(), 1);
    assert_eq!(receipt.uploads.failed_slots().len(), 3);
}

#[tokio::test]
async fn test_no_captured_images_is_fatal() {
    let fx = fixture();

    let err = fx
        .submitter
        .submit(&verified_with_evidence(json!({})), &SubmissionRequest::default())
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::NoEvidenceUploaded);
    assert_eq!(fx.uploader.calls(), 0);
}

#[tokio::test]
async fn test_already_verified_is_success() {
    let fx = fixture();
    fx.persistence.respond_with(Err(PersistenceError::Http {
        status: 409,
        code: Some(USER_ALREADY_VERIFIED.to_string()),
        message: "User already verified".to_string(),
    }));

    let receipt = fx
        .submitter
        .submit(&verified_with_evidence(all_evidence()), &SubmissionRequest::default())
        .await
        .unwrap();

    assert_eq!(receipt.status, SubmissionStatus::AlreadyVerified);
}

#[tokio::test]
async fn test_already_verified_in_body_is_success() {
    let fx = fixture();
    fx.persistence.respond_with(Ok(SaveReceipt {
        success: false,
        message: Some("User already verified".to_string()),
        code: Some(USER_ALREADY_VERIFIED.to_string()),
    }));

    let receipt = fx
        .submitter
        .submit(&verified_with_evidence(all_evidence()), &SubmissionRequest::default())
        .await
        .unwrap();

    assert_eq!(receipt.status, SubmissionStatus::AlreadyVerified);
}

#[tokio::test]
async fn test_unauthorized_save_is_auth_error() {
    let fx = fixture();
    fx.persistence.respond_with(Err(PersistenceError::Http {
        status: 401,
        code: None,
        message: "Token expired".to_string(),
    }));

    let err = fx
        .submitter
        .submit(&verified_with_evidence(all_evidence()), &SubmissionRequest::default())
        .await
        .unwrap_err();

    assert_eq!(err.error_type, ErrorType::Auth);
    assert_eq!(err.code, ErrorCode::Unauthorized);
}

#[tokio::test]
async fn test_payload_normalizes_similarity_and_applies_confirmation() {
    let fx = fixture();
    let session_id = Uuid::new_v4();
    let request = SubmissionRequest {
        session_id: Some(session_id),
        supplementary: SupplementaryFields {
            issue_place: Some("Cục Cảnh sát QLHC về TTXH".to_string()),
            full_name: Some("NGUYỄN VĂN A".to_string()),
            ..Default::default()
        },
    };

    fx.submitter
        .submit(&verified_with_evidence(all_evidence()), &request)
        .await
        .unwrap();

    let saved = fx.persistence.saved();
    let payload = &saved[0];
    assert_eq!(payload.session_id, Some(session_id));
    assert!((payload.face_similarity - 0.95).abs() < 1e-9);
    assert!(payload.face_matched);
    assert!(payload.front_card_live);
    assert!(!payload.back_card_live);
    assert_eq!(payload.age, 27.0);
    assert_eq!(payload.full_name.as_deref(), Some("NGUYỄN VĂN A"));
    assert_eq!(payload.id_number.as_deref(), Some("001099012345"));
    assert_eq!(payload.issue_place.as_deref(), Some("Cục Cảnh sát QLHC về TTXH"));
}
