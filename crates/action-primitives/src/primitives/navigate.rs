use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use super::{page_location, parse_params};
use crate::dispatcher::Tool;
use crate::errors::ToolError;
use crate::session_slot::SessionSlot;
use crate::types::ToolParams;

#[derive(Debug, Deserialize)]
struct NavigateParams {
    url: String,
}

/// Load a URL and report where the page ended up.
pub struct NavigateTool {
    session: SessionSlot,
}

impl NavigateTool {
    pub fn new(session: SessionSlot) -> Self {
        Self { session }
    }
}

#[async_trait]
impl Tool for NavigateTool {
    fn name(&self) -> &str {
        "navigate"
    }

    fn description(&self) -> &str {
        "Navigate to a URL. Parameters: url (string)"
    }

    async fn execute(&self, params: &ToolParams) -> Result<Value, ToolError> {
        let session = self.session.get()?;
        let NavigateParams { url } = parse_params(self.name(), params)?;
        if url.trim().is_empty() {
            return Err(ToolError::invalid_params(self.name(), "url cannot be empty"));
        }

        info!(url = %url, "Executing navigate primitive");
        session.navigate(&url).await?;
        let (current_url, title) = page_location(&session).await?;

        Ok(json!({
            "current_url": current_url,
            "title": title,
            "message": format!("Successfully navigated to {url}"),
        }))
    }
}
