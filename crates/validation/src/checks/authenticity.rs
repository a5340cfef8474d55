//! Check 2: document authenticity

use ekyc_core::{CardAuthenticity, CheckKind, IssueCode, ParsedResult, ValidationIssue};

use super::{is_below, CheckContext};

pub fn check_authenticity(result: &ParsedResult, ctx: &CheckContext<'_>) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for (side, card) in [
        ("Front", result.front_authenticity.as_ref()),
        ("Back", result.back_authenticity.as_ref()),
    ] {
        match card {
            Some(card) => check_card(side, card, ctx, &mut issues),
            None => issues.push(ValidationIssue::blocking(
                CheckKind::DocumentAuthenticity,
                IssueCode::CardLivenessMissing,
                format!("{side} card liveness result is missing"),
            )),
        }
    }

    issues
}

fn check_card(
    side: &str,
    card: &CardAuthenticity,
    ctx: &CheckContext<'_>,
    issues: &mut Vec<ValidationIssue>,
) {
    let mut block = |code, message: String| {
        issues.push(ValidationIssue::blocking(
            CheckKind::DocumentAuthenticity,
            code,
            message,
        ))
    };

    // Explicit detector flags block regardless of probabilities
    if card.fake_liveness {
        block(
            IssueCode::FakeDocument,
            format!("{side} card flagged as fake document"),
        );
    }
    if card.fake_print_photo {
        block(
            IssueCode::PrintedPhoto,
            format!("{side} card is a printed photo"),
        );
    }
    if card.face_swapping {
        block(
            IssueCode::FaceSwap,
            format!("{side} card portrait was swapped"),
        );
    }

    if !card.is_live() {
        let status = card.liveness.as_deref().unwrap_or("missing");
        let detail = card
            .liveness_message
            .as_deref()
            .map(|m| format!(" ({m})"))
            .unwrap_or_default();
        block(
            IssueCode::CardLivenessFailed,
            format!("{side} card liveness check failed: {status}{detail}"),
        );
    }

    if let Some(prob) = card.fake_liveness_prob {
        if !is_below(prob, ctx.config.max_fake_liveness_prob) {
            block(
                IssueCode::FakeLivenessProbability,
                format!(
                    "{side} card fake probability {prob} is not below {}",
                    ctx.config.max_fake_liveness_prob
                ),
            );
        }
    }

    if let Some(prob) = card.face_swap_prob {
        if !is_below(prob, ctx.config.max_face_swap_prob) {
            block(
                IssueCode::FaceSwapProbability,
                format!(
                    "{side} card face-swap probability {prob} is not below {}",
                    ctx.config.max_face_swap_prob
                ),
            );
        }
    }
}
