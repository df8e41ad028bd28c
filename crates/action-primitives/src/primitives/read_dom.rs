use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::page_location;
use crate::dispatcher::Tool;
use crate::dom::extract_page_digest;
use crate::errors::ToolError;
use crate::session_slot::SessionSlot;
use crate::types::ToolParams;

/// Summarize the current page as a [`crate::PageDigest`].
pub struct ReadDomTool {
    session: SessionSlot,
}

impl ReadDomTool {
    pub fn new(session: SessionSlot) -> Self {
        Self { session }
    }
}

#[async_trait]
impl Tool for ReadDomTool {
    fn name(&self) -> &str {
        "read_dom"
    }

    fn description(&self) -> &str {
        "Read the current page content and structure. No parameters needed"
    }

    async fn execute(&self, _params: &ToolParams) -> Result<Value, ToolError> {
        let session = self.session.get()?;
        let html = session.content().await?;
        let (url, title) = page_location(&session).await?;

        let digest = extract_page_digest(&html, &url, &title);
        debug!(
            url = %digest.url,
            elements = digest.interactive_elements.len(),
            text_length = digest.total_text_length,
            "Extracted page digest"
        );
        serde_json::to_value(digest).map_err(|err| ToolError::Internal(err.to_string()))
    }
}
