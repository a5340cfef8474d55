//! OCR section mapping

use ekyc_core::{DocumentField, DocumentFields};
use serde_json::{Map, Value};

use crate::section::{get_f64, get_str, get_str_list};

/// Characters of the MRZ birth-date line holding `YYMMDD`
const MRZ_BIRTH_RANGE: std::ops::Range<usize> = 0..6;
/// MRZ line carrying the birth date (TD1 layout)
const MRZ_BIRTH_LINE: usize = 1;
/// Century assumed for MRZ birth years
const MRZ_CENTURY: &str = "20";

/// Discriminator values of post-code entries
const POST_CODE_ADDRESS: &str = "address";
const POST_CODE_HOMETOWN: &str = "hometown";

/// OCR warnings and errors reported by the capture service
const OCR_MESSAGE_KEYS: [&str; 3] = ["warning_msg", "warning_messages", "errors"];

/// Raw field names for each document field, in lookup order
fn raw_keys(field: DocumentField) -> &'static [&'static str] {
    match field {
        DocumentField::Id => &["id"],
        DocumentField::Name => &["name"],
        DocumentField::DateOfBirth => &["birth_day", "dob"],
        DocumentField::IssueDate => &["issue_date"],
        DocumentField::ExpiryDate => &["valid_date", "expiry_date"],
        DocumentField::Sex => &["gender", "sex"],
        DocumentField::Nationality => &["nationality"],
        DocumentField::OriginAddress => &["origin_location", "hometown"],
        DocumentField::CurrentAddress => &["recent_location", "address"],
        DocumentField::DocumentType => &["card_type", "document_type"],
    }
}

/// OCR output: the fields plus any messages the service attached
pub struct OcrSection {
    pub fields: DocumentFields,
    pub messages: Vec<String>,
}

pub fn parse_ocr(obj: &Map<String, Value>) -> OcrSection {
    let read = |field| get_str(obj, raw_keys(field));

    let date_of_birth = read(DocumentField::DateOfBirth).or_else(|| {
        let derived = birth_date_from_mrz(obj);
        if derived.is_some() {
            tracing::debug!("Derived date of birth from MRZ");
        }
        derived
    });

    let (address_entries, hometown_entries) = partition_post_codes(obj);

    let fields = DocumentFields {
        id: read(DocumentField::Id),
        name: read(DocumentField::Name),
        date_of_birth,
        issue_date: read(DocumentField::IssueDate),
        expiry_date: read(DocumentField::ExpiryDate),
        sex: read(DocumentField::Sex),
        nationality: read(DocumentField::Nationality),
        origin_address: read(DocumentField::OriginAddress),
        current_address: read(DocumentField::CurrentAddress),
        document_type: read(DocumentField::DocumentType),
        confidence: read_confidences(obj),
        address_entries,
        hometown_entries,
    };

    let messages = OCR_MESSAGE_KEYS
        .iter()
        .flat_map(|key| get_str_list(obj, key))
        .collect();

    OcrSection { fields, messages }
}

/// Confidence scores keyed by field, normalized to 0-1
fn read_confidences(obj: &Map<String, Value>) -> std::collections::BTreeMap<String, f64> {
    DocumentField::ALL
        .iter()
        .filter_map(|field| {
            let prob_keys: Vec<String> = raw_keys(*field)
                .iter()
                .map(|key| format!("{key}_prob"))
                .collect();
            let prob_keys: Vec<&str> = prob_keys.iter().map(String::as_str).collect();

            get_f64(obj, &prob_keys).map(|score| (field.key(), normalize_confidence(score)))
        })
        .collect()
}

/// Scores above 1 are percentages
pub fn normalize_confidence(score: f64) -> f64 {
    if score > 1.0 {
        score / 100.0
    } else {
        score
    }
}

/// `DD/MM/20YY` from the `YYMMDD` prefix of the MRZ birth line
fn birth_date_from_mrz(obj: &Map<String, Value>) -> Option<String> {
    let lines: Vec<String> = get_str_list(obj, "mrz")
        .into_iter()
        .flat_map(|entry| {
            entry
                .lines()
                .map(|line| line.trim().to_string())
                .filter(|line| !line.is_empty())
                .collect::<Vec<_>>()
        })
        .collect();

    let line = lines.get(MRZ_BIRTH_LINE)?;
    let digits = line.get(MRZ_BIRTH_RANGE)?;
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let (yy, rest) = digits.split_at(2);
    let (mm, dd) = rest.split_at(2);
    Some(format!("{dd}/{mm}/{MRZ_CENTURY}{yy}"))
}

/// Split post-code entries by their `type` discriminator
fn partition_post_codes(obj: &Map<String, Value>) -> (Vec<Value>, Vec<Value>) {
    let Some(Value::Array(entries)) = obj.get("post_code") else {
        return (Vec::new(), Vec::new());
    };

    let mut address = Vec::new();
    let mut hometown = Vec::new();
    for entry in entries {
        match entry.get("type").and_then(Value::as_str) {
            Some(POST_CODE_ADDRESS) => address.push(entry.clone()),
            Some(POST_CODE_HOMETOWN) => hometown.push(entry.clone()),
            other => tracing::debug!(kind = ?other, "Ignoring post-code entry"),
        }
    }
    (address, hometown)
}
