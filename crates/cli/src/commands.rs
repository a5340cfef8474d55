//! CLI commands

use chrono::NaiveDate;
use ekyc_core::{
    present, ClassifiedError, ErrorPresentation, EvidenceSlot, ParsedResult, ValidationReport,
};
use ekyc_parser::parse_capture;
use ekyc_session::{
    CaptureKind, CaptureOutcome, CaptureSessionController, MockCaptureDevice, MockTokenProvider,
    SessionSnapshot,
};
use ekyc_submission::{
    EvidenceSubmitter, MockFileUploader, MockPersistenceApi, PersistenceError, SubmissionReceipt,
    SubmissionRequest, USER_ALREADY_VERIFIED,
};
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use crate::context::AppContext;

/// Read a capture blob from a file, or stdin when the path is `-`
pub fn read_blob(path: &Path) -> Result<String, anyhow::Error> {
    if path == Path::new("-") {
        let mut raw = String::new();
        std::io::stdin().read_to_string(&mut raw)?;
        return Ok(raw);
    }
    Ok(std::fs::read_to_string(path)?)
}

/// Parse a blob into its typed form
pub fn parse(raw: &str) -> Result<ParsedResult, anyhow::Error> {
    Ok(parse_capture(raw)?)
}

/// Parse and validate a blob
pub fn validate(
    ctx: &AppContext,
    raw: &str,
    today: Option<NaiveDate>,
) -> Result<ValidationReport, anyhow::Error> {
    let result = parse(raw)?;
    let report = match today {
        Some(today) => ctx.engine.validate(&result, today),
        None => ctx.engine.validate_now(&result),
    };
    Ok(report)
}

/// Knobs for the simulated services
#[derive(Debug, Clone, Default)]
pub struct SimulateOptions {
    pub kind: CaptureKind,
    pub fail_uploads: Vec<EvidenceSlot>,
    pub already_verified: bool,
}

/// Full run of the pipeline against in-memory services
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub session: SessionSnapshot,
    pub submission: Option<SubmissionReceipt>,
    pub error: Option<ClassifiedError>,
    pub presentation: Option<ErrorPresentation>,
}

/// Run capture, validation and submission with mock collaborators
pub async fn simulate(
    ctx: &AppContext,
    raw: &str,
    options: SimulateOptions,
) -> Result<SimulationReport, anyhow::Error> {
    let controller = CaptureSessionController::new(
        Arc::new(MockCaptureDevice::returning(raw)),
        Arc::new(MockTokenProvider::default()),
        ctx.engine.clone(),
        ctx.config.session.clone(),
    );

    let session_id = controller.initialize().await?;

    let (submission, error) = match controller.start_capture(options.kind).await {
        Ok(CaptureOutcome::Completed(verified)) => {
            let uploader = Arc::new(MockFileUploader::new());
            for slot in &options.fail_uploads {
                uploader.fail_slot(*slot);
            }
            let persistence = Arc::new(MockPersistenceApi::new());
            if options.already_verified {
                persistence.respond_with(Err(PersistenceError::Http {
                    status: 409,
                    code: Some(USER_ALREADY_VERIFIED.to_string()),
                    message: "User already verified".to_string(),
                }));
            }

            let submitter = EvidenceSubmitter::new(uploader, persistence);
            let request = SubmissionRequest {
                session_id: Some(session_id),
                ..Default::default()
            };
            match submitter.submit(&verified, &request).await {
                Ok(receipt) => (Some(receipt), None),
                Err(err) => (None, Some(err)),
            }
        }
        Ok(_) => (None, None),
        Err(err) => (None, Some(err)),
    };

    Ok(SimulationReport {
        session: controller.snapshot().await,
        submission,
        presentation: error.as_ref().map(present),
        error,
    })
}
