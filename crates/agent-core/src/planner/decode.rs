use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::warn;

use crate::model::ActionPlan;

static FENCED_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```(?:json)?[ \t]*\r?\n(.*?)```").expect("fenced block pattern is valid")
});

const PREVIEW_CHARS: usize = 200;

/// Decode raw planner output into an [`ActionPlan`].
///
/// Tries the whole text as a JSON object, then the first fenced code block,
/// and otherwise returns [`ActionPlan::fallback`]. Unknown keys in the
/// decoded object are ignored.
pub fn decode_plan(raw: &str) -> ActionPlan {
    if let Some(plan) = parse_plan(raw) {
        return plan;
    }

    let fenced = FENCED_BLOCK
        .captures(raw)
        .and_then(|captures| captures.get(1))
        .and_then(|block| parse_plan(block.as_str()));
    if let Some(plan) = fenced {
        return plan;
    }

    let preview: String = raw.chars().take(PREVIEW_CHARS).collect();
    warn!(target: "planner", raw = %preview, "Failed to decode planner output, falling back to wait");
    ActionPlan::fallback()
}

fn parse_plan(text: &str) -> Option<ActionPlan> {
    let value: Value = serde_json::from_str(text.trim()).ok()?;
    if !value.is_object() {
        return None;
    }
    serde_json::from_value(value).ok()
}
