//! Validation thresholds
//!
//! All thresholds are configurable via file, not hardcoded.
//! Scales: confidences and probabilities are 0-1, similarity is 0-100.

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};

/// Configuration for the Validation Engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    // === OCR ===
    /// Per-field confidence below this is a warning (0-1)
    #[serde(default = "default_min_field_confidence")]
    pub min_field_confidence: f64,

    /// Pattern the document id must match
    #[serde(default = "default_id_pattern")]
    pub id_pattern: String,

    /// Accepted document types (case-insensitive)
    #[serde(default = "default_allowed_document_types")]
    pub allowed_document_types: Vec<String>,

    // === Document authenticity ===
    /// Fake-liveness probability must stay strictly below this (0-1)
    #[serde(default = "default_max_fake_liveness_prob")]
    pub max_fake_liveness_prob: f64,

    /// Face-swap probability must stay strictly below this (0-1)
    #[serde(default = "default_max_face_swap_prob")]
    pub max_face_swap_prob: f64,

    // === Face match ===
    /// Minimum similarity, inclusive (0-100)
    #[serde(default = "default_min_face_similarity")]
    pub min_face_similarity: f64,

    // === Liveness ===
    /// Blur score must stay strictly below this (0-1)
    #[serde(default = "default_max_blur_score")]
    pub max_blur_score: f64,

    #[serde(default = "default_min_age")]
    pub min_age: f64,

    #[serde(default = "default_max_age")]
    pub max_age: f64,
}

fn default_min_field_confidence() -> f64 {
    0.8
}

fn default_id_pattern() -> String {
    r"^\d{12}$".to_string()
}

fn default_allowed_document_types() -> Vec<String> {
    vec![
        "CCCD".to_string(),
        "CCCD_CHIP".to_string(),
        "CAN_CUOC".to_string(),
    ]
}

fn default_max_fake_liveness_prob() -> f64 {
    0.3
}

fn default_max_face_swap_prob() -> f64 {
    0.2
}

fn default_min_face_similarity() -> f64 {
    90.0
}

fn default_max_blur_score() -> f64 {
    0.5
}

fn default_min_age() -> f64 {
    16.0
}

fn default_max_age() -> f64 {
    150.0
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_field_confidence: default_min_field_confidence(),
            id_pattern: default_id_pattern(),
            allowed_document_types: default_allowed_document_types(),
            max_fake_liveness_prob: default_max_fake_liveness_prob(),
            max_face_swap_prob: default_max_face_swap_prob(),
            min_face_similarity: default_min_face_similarity(),
            max_blur_score: default_max_blur_score(),
            min_age: default_min_age(),
            max_age: default_max_age(),
        }
    }
}

impl ValidationConfig {
    /// Load configuration from JSON file
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Reject thresholds outside their scale
    pub fn check(&self) -> ValidationResult<()> {
        let unit = [
            ("min_field_confidence", self.min_field_confidence),
            ("max_fake_liveness_prob", self.max_fake_liveness_prob),
            ("max_face_swap_prob", self.max_face_swap_prob),
            ("max_blur_score", self.max_blur_score),
        ];
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(ValidationError::InvalidThreshold(format!(
                    "{name} must be within 0..1, got {value}"
                )));
            }
        }

        if !(0.0..=100.0).contains(&self.min_face_similarity) {
            return Err(ValidationError::InvalidThreshold(format!(
                "min_face_similarity must be within 0..100, got {}",
                self.min_face_similarity
            )));
        }

        if self.min_age > self.max_age {
            return Err(ValidationError::InvalidThreshold(format!(
                "min_age ({}) exceeds max_age ({})",
                self.min_age, self.max_age
            )));
        }

        Ok(())
    }

    /// Whether a document type is accepted
    pub fn is_allowed_document_type(&self, document_type: &str) -> bool {
        self.allowed_document_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(document_type.trim()))
    }
}
