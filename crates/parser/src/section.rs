//! Section decoding and value coercion
//!
//! Each named section of the blob is either a JSON-encoded string or an
//! inline JSON value. Sentinel values (`""`, `"undefined"`, `"null"`, JSON
//! `null`) mean the check produced no data.

use serde_json::{Map, Value};

/// Wire keys of the raw capture blob
pub mod keys {
    pub const OCR: &str = "INFO_RESULT";
    pub const CARD_FRONT_LIVENESS: &str = "LIVENESS_CARD_FRONT_RESULT";
    pub const CARD_REAR_LIVENESS: &str = "LIVENESS_CARD_REAR_RESULT";
    pub const FACE_COMPARE: &str = "COMPARE_RESULT";
    pub const FACE_LIVENESS: &str = "LIVENESS_FACE_RESULT";
    pub const MASK: &str = "MASKED_FACE_RESULT";
    pub const VERIFY_FACE: &str = "VERIFY_FACE_RESULT";

    pub const FRONT_IMAGE: &str = "FRONT_IMAGE";
    pub const REAR_IMAGE: &str = "REAR_IMAGE";
    pub const NEAR_FACE_IMAGE: &str = "PORTRAIT_NEAR_IMAGE";
    pub const FAR_FACE_IMAGE: &str = "PORTRAIT_FAR_IMAGE";

    /// Result sections, in parse order
    pub const RESULT_SECTIONS: [&str; 7] = [
        OCR,
        CARD_FRONT_LIVENESS,
        CARD_REAR_LIVENESS,
        FACE_COMPARE,
        FACE_LIVENESS,
        MASK,
        VERIFY_FACE,
    ];
}

/// Key under which the capture service nests the section payload
const PAYLOAD_KEY: &str = "object";

/// True for values that mean "no data"
pub fn is_sentinel(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || trimmed == "undefined" || trimmed == "null"
}

/// Decode one result section into its payload object.
///
/// Returns `None` when the section is absent or a sentinel, and also when it
/// is corrupted; corruption is logged and never aborts the parse.
pub fn read_section(root: &Map<String, Value>, key: &str) -> Option<Map<String, Value>> {
    let value = match root.get(key)? {
        Value::Null => return None,
        Value::String(raw) if is_sentinel(raw) => return None,
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(decoded) => decoded,
            Err(e) => {
                tracing::warn!(section = key, error = %e, "Skipping corrupted section");
                return None;
            }
        },
        other => other.clone(),
    };

    match value {
        Value::Object(mut map) => match map.remove(PAYLOAD_KEY) {
            Some(Value::Object(payload)) => Some(payload),
            Some(other) => {
                map.insert(PAYLOAD_KEY.to_string(), other);
                Some(map)
            }
            None => Some(map),
        },
        Value::Null => None,
        other => {
            tracing::warn!(
                section = key,
                kind = value_kind(&other),
                "Skipping section with unexpected shape"
            );
            None
        }
    }
}

/// Read a plain string field (image paths), dropping sentinels
pub fn read_path(root: &Map<String, Value>, key: &str) -> Option<String> {
    match root.get(key)? {
        Value::String(raw) if !is_sentinel(raw) => Some(raw.trim().to_string()),
        _ => None,
    }
}

/// First non-sentinel string among `keys`; numbers are stringified
pub fn get_str(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match obj.get(*key)? {
        Value::String(s) if !is_sentinel(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// First numeric value among `keys`; numeric strings are accepted
pub fn get_f64(obj: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|key| match obj.get(*key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').parse::<f64>().ok(),
        _ => None,
    })
}

/// First boolean-like value among `keys`: `true`/`false`, `"yes"`/`"no"`,
/// `"true"`/`"false"`, `1`/`0`
pub fn get_bool(obj: &Map<String, Value>, keys: &[&str]) -> Option<bool> {
    keys.iter().find_map(|key| match obj.get(*key)? {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|v| v != 0),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "yes" | "true" | "1" => Some(true),
            "no" | "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

/// Strings of an array or a single string field
pub fn get_str_list(obj: &Map<String, Value>, key: &str) -> Vec<String> {
    match obj.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str())
            .filter(|s| !is_sentinel(s))
            .map(|s| s.trim().to_string())
            .collect(),
        Some(Value::String(s)) if !is_sentinel(s) => vec![s.trim().to_string()],
        _ => Vec::new(),
    }
}

pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
