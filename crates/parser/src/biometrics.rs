//! Card liveness, face compare, face liveness and mask sections

use ekyc_core::{CardAuthenticity, FaceLiveness, FaceMatch, MatchVerdict};
use serde_json::{Map, Value};

use crate::section::{get_bool, get_f64, get_str};

pub fn parse_card_authenticity(obj: &Map<String, Value>) -> CardAuthenticity {
    CardAuthenticity {
        liveness: get_str(obj, &["liveness"]),
        liveness_message: get_str(obj, &["liveness_msg", "message"]),
        fake_liveness_prob: get_f64(obj, &["fake_liveness_prob"]),
        face_swap_prob: get_f64(obj, &["face_swapping_prob", "face_swap_prob"]),
        fake_liveness: get_bool(obj, &["fake_liveness"]).unwrap_or(false),
        fake_print_photo: get_bool(obj, &["fake_print_photo"]).unwrap_or(false),
        face_swapping: get_bool(obj, &["face_swapping"]).unwrap_or(false),
    }
}

/// Face compare and verify-face share one layout
pub fn parse_face_match(obj: &Map<String, Value>) -> FaceMatch {
    let verdict = get_str(obj, &["msg", "verdict"])
        .and_then(|raw| raw.parse::<MatchVerdict>().ok())
        .unwrap_or_default();

    FaceMatch {
        similarity: get_f64(obj, &["prob", "similarity"]),
        verdict,
        message: get_str(obj, &["result", "message"]),
        multiple_faces: get_bool(obj, &["multiple_faces"]).unwrap_or(false),
    }
}

pub fn parse_face_liveness(obj: &Map<String, Value>) -> FaceLiveness {
    FaceLiveness {
        liveness: get_str(obj, &["liveness"]),
        liveness_message: get_str(obj, &["liveness_msg", "message"]),
        age: get_f64(obj, &["age"]),
        gender: get_str(obj, &["gender"]),
        blur_score: get_f64(obj, &["blur_face_score", "blur_score"]),
        eyes_open: get_bool(obj, &["is_eye_open", "eyes_open"]),
        multiple_faces: get_bool(obj, &["multiple_faces"]).unwrap_or(false),
    }
}

/// `None` when the section carries no usable flag
pub fn parse_mask(obj: &Map<String, Value>) -> Option<bool> {
    get_bool(obj, &["masked", "is_masked"])
}
