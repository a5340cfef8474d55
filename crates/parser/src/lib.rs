//! eKYC Parser - turns one raw capture blob into a [`ParsedResult`]
//!
//! ```text
//! { "INFO_RESULT": "{...}",                ──► document_fields
//!   "LIVENESS_CARD_FRONT_RESULT": "{...}", ──► front_authenticity
//!   "LIVENESS_CARD_REAR_RESULT": "{...}",  ──► back_authenticity
//!   "COMPARE_RESULT": "{...}",             ──► face_match
//!   "LIVENESS_FACE_RESULT": "{...}",       ──► face_liveness
//!   "MASKED_FACE_RESULT": "{...}",         ──► masked
//!   "VERIFY_FACE_RESULT": "{...}",         ──► verify_face
//!   "FRONT_IMAGE": "...", ... }            ──► evidence
//! ```
//!
//! Sections are independent: an absent or corrupted section only removes
//! that section from the result. The parse fails only when the blob itself
//! is not a JSON object.

pub mod biometrics;
pub mod error;
pub mod ocr;
pub mod section;

use ekyc_core::{EvidencePaths, ParsedResult};
use serde_json::Value;

pub use error::{ParseError, ParseResult};
pub use section::keys;

/// True when the device returned nothing, which means the user cancelled
pub fn is_blank(raw: &str) -> bool {
    raw.trim().is_empty()
}

/// Parse a raw capture blob
pub fn parse_capture(raw: &str) -> ParseResult<ParsedResult> {
    if is_blank(raw) {
        return Err(ParseError::Empty);
    }

    let root = match serde_json::from_str::<Value>(raw)? {
        Value::Object(map) => map,
        other => return Err(ParseError::NotAnObject(section::value_kind(&other))),
    };

    let mut result = ParsedResult::default();

    if let Some(obj) = section::read_section(&root, keys::OCR) {
        let ocr = ocr::parse_ocr(&obj);
        result.document_fields = Some(ocr.fields);
        result.ocr_errors = ocr.messages;
    }

    result.front_authenticity = section::read_section(&root, keys::CARD_FRONT_LIVENESS)
        .map(|obj| biometrics::parse_card_authenticity(&obj));
    result.back_authenticity = section::read_section(&root, keys::CARD_REAR_LIVENESS)
        .map(|obj| biometrics::parse_card_authenticity(&obj));
    result.face_match = section::read_section(&root, keys::FACE_COMPARE)
        .map(|obj| biometrics::parse_face_match(&obj));
    result.face_liveness = section::read_section(&root, keys::FACE_LIVENESS)
        .map(|obj| biometrics::parse_face_liveness(&obj));
    result.masked = section::read_section(&root, keys::MASK)
        .and_then(|obj| biometrics::parse_mask(&obj));
    result.verify_face = section::read_section(&root, keys::VERIFY_FACE)
        .map(|obj| biometrics::parse_face_match(&obj));

    result.evidence = EvidencePaths {
        front: section::read_path(&root, keys::FRONT_IMAGE),
        back: section::read_path(&root, keys::REAR_IMAGE),
        near_face: section::read_path(&root, keys::NEAR_FACE_IMAGE),
        far_face: section::read_path(&root, keys::FAR_FACE_IMAGE),
    };

    tracing::debug!(
        has_ocr = result.document_fields.is_some(),
        has_face_match = result.face_match.is_some(),
        has_face_liveness = result.face_liveness.is_some(),
        missing_evidence = result.evidence.missing().len(),
        "Parsed capture result"
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_is_empty_error() {
        assert!(matches!(parse_capture("   "), Err(ParseError::Empty)));
        assert!(is_blank("\n\t"));
        assert!(!is_blank("{}"));
    }

    #[test]
    fn test_top_level_syntax_error_is_fatal() {
        assert!(matches!(
            parse_capture("{\"INFO_RESULT\": "),
            Err(ParseError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_top_level_must_be_object() {
        assert!(matches!(
            parse_capture("[1, 2]"),
            Err(ParseError::NotAnObject("array"))
        ));
    }

    #[test]
    fn test_empty_object_yields_empty_result() {
        let result = parse_capture("{}").unwrap();
        assert_eq!(result, ParsedResult::default());
        assert!(!result.is_content_bearing());
    }
}
