use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use super::{page_location, parse_params};
use crate::dispatcher::Tool;
use crate::errors::ToolError;
use crate::session_slot::SessionSlot;
use crate::types::{ToolParams, ToolSettings};

#[derive(Debug, Deserialize)]
struct ClickParams {
    selector: String,
}

/// Click the first element matching a CSS selector.
pub struct ClickTool {
    session: SessionSlot,
    settings: ToolSettings,
}

impl ClickTool {
    pub fn new(session: SessionSlot, settings: ToolSettings) -> Self {
        Self { session, settings }
    }
}

#[async_trait]
impl Tool for ClickTool {
    fn name(&self) -> &str {
        "click"
    }

    fn description(&self) -> &str {
        "Click on an element. Parameters: selector (CSS selector)"
    }

    async fn execute(&self, params: &ToolParams) -> Result<Value, ToolError> {
        let session = self.session.get()?;
        let ClickParams { selector } = parse_params(self.name(), params)?;

        info!(selector = %selector, "Executing click primitive");
        session.click(&selector, self.settings.selector_timeout).await?;
        if !self.settings.click_settle.is_zero() {
            tokio::time::sleep(self.settings.click_settle).await;
        }
        let (current_url, _) = page_location(&session).await?;

        Ok(json!({
            "message": format!("Clicked element: {selector}"),
            "current_url": current_url,
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::fixture::FixtureSession;

    fn fixture() -> Arc<FixtureSession> {
        Arc::new(
            FixtureSession::new()
                .with_page(
                    "https://shop.test/",
                    r#"<html><body><a class="next" href="https://shop.test/cart">Cart</a></body></html>"#,
                )
                .with_page("https://shop.test/cart", "<html><body>cart</body></html>")
                .starting_at("https://shop.test/"),
        )
    }

    #[tokio::test]
    async fn click_reports_resulting_url() {
        let session = fixture();
        let tool = ClickTool::new(SessionSlot::with_session(session.clone()), ToolSettings::immediate());
        let params = json!({"selector": "a.next"});
        let result = tool.execute(params.as_object().unwrap()).await.unwrap();

        assert_eq!(result["message"], "Clicked element: a.next");
        assert_eq!(result["current_url"], "https://shop.test/cart");
        assert_eq!(session.clicks(), vec!["a.next".to_string()]);
    }

    #[tokio::test]
    async fn unmatched_selector_surfaces_session_error() {
        let tool = ClickTool::new(SessionSlot::with_session(fixture()), ToolSettings::immediate());
        let params = json!({"selector": "#missing"});
        let err = tool.execute(params.as_object().unwrap()).await.unwrap_err();
        assert!(matches!(err, ToolError::Session(_)));
    }
}
