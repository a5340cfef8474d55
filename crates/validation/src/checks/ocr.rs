//! Check 1: OCR validity

use chrono::NaiveDate;
use ekyc_core::{CheckKind, DocumentField, IssueCode, ParsedResult, ValidationIssue};

use super::CheckContext;

/// chrono format of `DD/MM/YYYY`
pub const DATE_FORMAT: &str = "%d/%m/%Y";

const DATE_FIELDS: [DocumentField; 3] = [
    DocumentField::DateOfBirth,
    DocumentField::IssueDate,
    DocumentField::ExpiryDate,
];

pub fn check_ocr(result: &ParsedResult, ctx: &CheckContext<'_>) -> Vec<ValidationIssue> {
    let blocking = |code, message: String| {
        ValidationIssue::blocking(CheckKind::OcrValidity, code, message)
    };

    let Some(fields) = result.document_fields.as_ref().filter(|f| !f.is_empty()) else {
        let mut message = "OCR result is missing".to_string();
        if !result.ocr_errors.is_empty() {
            message = format!("{message}: {}", result.ocr_errors.join("; "));
        }
        return vec![blocking(IssueCode::OcrMissing, message)];
    };

    let mut issues = Vec::new();

    for field in DocumentField::ALL {
        if fields.non_blank(field).is_none() {
            issues.push(blocking(
                IssueCode::OcrFieldMissing,
                format!("Missing required field: {field}"),
            ));
        }
    }

    if let Some(id) = fields.non_blank(DocumentField::Id) {
        if !ctx.id_pattern.is_match(id) {
            issues.push(blocking(
                IssueCode::InvalidIdFormat,
                format!("Invalid document id format: {id}"),
            ));
        }
    }

    for field in DATE_FIELDS {
        let Some(raw) = fields.non_blank(field) else {
            continue;
        };
        if !ctx.date_pattern.is_match(raw) {
            issues.push(blocking(
                IssueCode::InvalidDateFormat,
                format!("{field} must be DD/MM/YYYY, got {raw}"),
            ));
            continue;
        }
        match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
            Ok(date) => {
                if field == DocumentField::ExpiryDate && date < ctx.today {
                    issues.push(blocking(
                        IssueCode::DocumentExpired,
                        format!("Document expired on {raw}"),
                    ));
                }
            }
            Err(_) => issues.push(blocking(
                IssueCode::InvalidDate,
                format!("{field} is not a calendar date: {raw}"),
            )),
        }
    }

    if let Some(document_type) = fields.non_blank(DocumentField::DocumentType) {
        if !ctx.config.is_allowed_document_type(document_type) {
            issues.push(blocking(
                IssueCode::UnsupportedDocumentType,
                format!("Unsupported document type: {document_type}"),
            ));
        }
    }

    for field in DocumentField::ALL {
        if let Some(confidence) = fields.confidence_of(field) {
            if confidence.is_nan() || confidence < ctx.config.min_field_confidence {
                issues.push(ValidationIssue::warning(
                    CheckKind::OcrValidity,
                    IssueCode::LowFieldConfidence,
                    format!("Low OCR confidence for {field}: {confidence:.2}"),
                ));
            }
        }
    }

    issues
}
