use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use super::parse_params;
use crate::dispatcher::Tool;
use crate::errors::ToolError;
use crate::session_slot::SessionSlot;
use crate::types::{ToolParams, ToolSettings};

#[derive(Debug, Deserialize)]
struct TypeParams {
    selector: String,
    text: String,
}

/// Replace the contents of an input field. Registered as `type`.
pub struct TypeTextTool {
    session: SessionSlot,
    settings: ToolSettings,
}

impl TypeTextTool {
    pub fn new(session: SessionSlot, settings: ToolSettings) -> Self {
        Self { session, settings }
    }
}

#[async_trait]
impl Tool for TypeTextTool {
    fn name(&self) -> &str {
        "type"
    }

    fn description(&self) -> &str {
        "Type text into an input field. Parameters: selector (CSS selector), text (string)"
    }

    async fn execute(&self, params: &ToolParams) -> Result<Value, ToolError> {
        let session = self.session.get()?;
        let TypeParams { selector, text } = parse_params(self.name(), params)?;

        info!(selector = %selector, chars = text.chars().count(), "Executing type primitive");
        session
            .fill(&selector, &text, self.settings.selector_timeout)
            .await?;

        Ok(json!({
            "message": format!("Typed text into {selector}"),
            "text": text,
        }))
    }
}
