//! Normalized capture output
//!
//! A [`ParsedResult`] is what the parser produces from one raw capture blob.
//! Every section is optional: `None` means "no data for this check", never
//! an error. Downstream code only ever sees typed absence.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Liveness status string reported by the capture service on success
pub const STATUS_SUCCESS: &str = "success";

/// OCR fields read from the identity document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentFields {
    pub id: Option<String>,
    pub name: Option<String>,
    /// `DD/MM/YYYY`
    pub date_of_birth: Option<String>,
    pub issue_date: Option<String>,
    pub expiry_date: Option<String>,
    pub sex: Option<String>,
    pub nationality: Option<String>,
    pub origin_address: Option<String>,
    pub current_address: Option<String>,
    pub document_type: Option<String>,
    /// Per-field confidence on a 0-1 scale, keyed by [`DocumentField::key`]
    #[serde(default)]
    pub confidence: BTreeMap<String, f64>,
    /// Post-code entries discriminated as "address"
    #[serde(default)]
    pub address_entries: Vec<serde_json::Value>,
    /// Post-code entries discriminated as "hometown"
    #[serde(default)]
    pub hometown_entries: Vec<serde_json::Value>,
}

/// The ten required document fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum DocumentField {
    Id,
    Name,
    DateOfBirth,
    IssueDate,
    ExpiryDate,
    Sex,
    Nationality,
    OriginAddress,
    CurrentAddress,
    DocumentType,
}

impl DocumentField {
    pub const ALL: [DocumentField; 10] = [
        DocumentField::Id,
        DocumentField::Name,
        DocumentField::DateOfBirth,
        DocumentField::IssueDate,
        DocumentField::ExpiryDate,
        DocumentField::Sex,
        DocumentField::Nationality,
        DocumentField::OriginAddress,
        DocumentField::CurrentAddress,
        DocumentField::DocumentType,
    ];

    /// Key used in the confidence map
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl DocumentFields {
    /// Value of a required field
    pub fn get(&self, field: DocumentField) -> Option<&str> {
        let value = match field {
            DocumentField::Id => &self.id,
            DocumentField::Name => &self.name,
            DocumentField::DateOfBirth => &self.date_of_birth,
            DocumentField::IssueDate => &self.issue_date,
            DocumentField::ExpiryDate => &self.expiry_date,
            DocumentField::Sex => &self.sex,
            DocumentField::Nationality => &self.nationality,
            DocumentField::OriginAddress => &self.origin_address,
            DocumentField::CurrentAddress => &self.current_address,
            DocumentField::DocumentType => &self.document_type,
        };
        value.as_deref()
    }

    /// Value of a required field, `None` when missing or blank
    pub fn non_blank(&self, field: DocumentField) -> Option<&str> {
        self.get(field).map(str::trim).filter(|v| !v.is_empty())
    }

    /// True when no required field carries a value
    pub fn is_empty(&self) -> bool {
        DocumentField::ALL
            .iter()
            .all(|field| self.non_blank(*field).is_none())
    }

    /// Confidence recorded for a field, if any
    pub fn confidence_of(&self, field: DocumentField) -> Option<f64> {
        self.confidence.get(&field.key()).copied()
    }
}

/// Liveness analysis of one side of the identity card
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardAuthenticity {
    /// Raw liveness status, `"success"` when the card is genuine
    pub liveness: Option<String>,
    pub liveness_message: Option<String>,
    pub fake_liveness_prob: Option<f64>,
    pub face_swap_prob: Option<f64>,
    #[serde(default)]
    pub fake_liveness: bool,
    #[serde(default)]
    pub fake_print_photo: bool,
    #[serde(default)]
    pub face_swapping: bool,
}

impl CardAuthenticity {
    pub fn is_live(&self) -> bool {
        status_is_success(self.liveness.as_deref())
    }
}

/// Verdict of a face comparison
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum MatchVerdict {
    Match,
    #[strum(serialize = "NOMATCH", serialize = "NO_MATCH")]
    NoMatch,
    #[default]
    Unknown,
}

/// Face comparison between the card portrait and the selfie
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaceMatch {
    /// Similarity on a 0-100 scale
    pub similarity: Option<f64>,
    #[serde(default)]
    pub verdict: MatchVerdict,
    pub message: Option<String>,
    #[serde(default)]
    pub multiple_faces: bool,
}

impl FaceMatch {
    pub fn is_match(&self) -> bool {
        self.verdict == MatchVerdict::Match
    }
}

/// Liveness and attribute analysis of the selfie
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaceLiveness {
    pub liveness: Option<String>,
    pub liveness_message: Option<String>,
    pub age: Option<f64>,
    pub gender: Option<String>,
    pub blur_score: Option<f64>,
    pub eyes_open: Option<bool>,
    #[serde(default)]
    pub multiple_faces: bool,
}

impl FaceLiveness {
    pub fn is_live(&self) -> bool {
        status_is_success(self.liveness.as_deref())
    }
}

/// The four evidence slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EvidenceSlot {
    FrontCard,
    BackCard,
    NearFace,
    FarFace,
}

impl EvidenceSlot {
    pub const ALL: [EvidenceSlot; 4] = [
        EvidenceSlot::FrontCard,
        EvidenceSlot::BackCard,
        EvidenceSlot::NearFace,
        EvidenceSlot::FarFace,
    ];
}

/// References to the captured images
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidencePaths {
    pub front: Option<String>,
    pub back: Option<String>,
    pub near_face: Option<String>,
    pub far_face: Option<String>,
}

impl EvidencePaths {
    pub fn get(&self, slot: EvidenceSlot) -> Option<&str> {
        match slot {
            EvidenceSlot::FrontCard => self.front.as_deref(),
            EvidenceSlot::BackCard => self.back.as_deref(),
            EvidenceSlot::NearFace => self.near_face.as_deref(),
            EvidenceSlot::FarFace => self.far_face.as_deref(),
        }
    }

    /// Slots with no captured image
    pub fn missing(&self) -> Vec<EvidenceSlot> {
        EvidenceSlot::ALL
            .into_iter()
            .filter(|slot| self.get(*slot).is_none())
            .collect()
    }
}

/// Structured output of one capture attempt
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedResult {
    pub document_fields: Option<DocumentFields>,
    pub front_authenticity: Option<CardAuthenticity>,
    pub back_authenticity: Option<CardAuthenticity>,
    pub face_match: Option<FaceMatch>,
    pub face_liveness: Option<FaceLiveness>,
    /// Mask check outcome, `None` when the check did not run
    pub masked: Option<bool>,
    pub verify_face: Option<FaceMatch>,
    #[serde(default)]
    pub evidence: EvidencePaths,
    #[serde(default)]
    pub ocr_errors: Vec<String>,
}

impl ParsedResult {
    /// Weak completeness check gating forward navigation.
    ///
    /// Requires OCR output (fields or reported errors), at least one card
    /// authenticity result, and a face liveness result. Independent of the
    /// full validation verdict.
    pub fn is_content_bearing(&self) -> bool {
        let has_ocr = self
            .document_fields
            .as_ref()
            .map(|fields| !fields.is_empty())
            .unwrap_or(false)
            || !self.ocr_errors.is_empty();
        let has_authenticity =
            self.front_authenticity.is_some() || self.back_authenticity.is_some();

        has_ocr && has_authenticity && self.face_liveness.is_some()
    }
}

/// Biological sex as reported by OCR or face analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Normalize the spellings used by OCR ("Nam"/"Nữ", "M"/"F") and face
    /// analysis ("male"/"female")
    pub fn normalize(raw: &str) -> Option<Sex> {
        match raw.trim().to_lowercase().as_str() {
            "nam" | "m" | "male" => Some(Sex::Male),
            "nữ" | "nu" | "f" | "female" => Some(Sex::Female),
            _ => None,
        }
    }
}

fn status_is_success(status: Option<&str>) -> bool {
    status
        .map(|s| s.trim().eq_ignore_ascii_case(STATUS_SUCCESS))
        .unwrap_or(false)
}
