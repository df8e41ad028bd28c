//! Turns the `read_dom` tool output into the state text shown to the planner.

use std::fmt::Write;

use action_primitives::{PageDigest, ToolDispatcher, ToolError, ToolParams};
use tracing::debug;

const READ_DOM: &str = "read_dom";
const DEFAULT_ELEMENT_LIMIT: usize = 5;

/// Builds bounded natural-language observations of the current page.
#[derive(Debug, Clone)]
pub struct ObservationBuilder {
    element_limit: usize,
}

impl Default for ObservationBuilder {
    fn default() -> Self {
        Self {
            element_limit: DEFAULT_ELEMENT_LIMIT,
        }
    }
}

impl ObservationBuilder {
    pub fn new(element_limit: usize) -> Self {
        Self { element_limit }
    }

    /// Read the page through the dispatcher. Failures are described, never raised.
    pub async fn observe(&self, dispatcher: &ToolDispatcher) -> String {
        match dispatcher.dispatch(READ_DOM, &ToolParams::new()).await {
            Ok(outcome) if outcome.success => {
                let payload = outcome.result.unwrap_or_default();
                match serde_json::from_value::<PageDigest>(payload) {
                    Ok(digest) => self.format_digest(&digest),
                    Err(err) => format!("Failed to read DOM: malformed page digest: {err}"),
                }
            }
            Ok(outcome) => format!(
                "Failed to read DOM: {}",
                outcome.error.unwrap_or_else(|| "unknown error".to_string())
            ),
            Err(ToolError::SessionUnavailable) => {
                debug!("Observation requested before a session was attached");
                "Browser not initialized".to_string()
            }
            Err(err) => format!("Failed to read DOM: {err}"),
        }
    }

    pub fn format_digest(&self, digest: &PageDigest) -> String {
        let mut text = String::new();
        let _ = writeln!(text, "Current URL: {}", digest.url);
        let _ = writeln!(text, "Page Title: {}", digest.title);
        let _ = writeln!(text, "Page Content Preview: {}", digest.text_preview);
        let _ = writeln!(text);
        let _ = writeln!(text, "Interactive Elements:");
        for element in digest.interactive_elements.iter().take(self.element_limit) {
            let _ = writeln!(text, "- {}: {}", element.kind, element.label());
        }
        text.trim().to_string()
    }
}
