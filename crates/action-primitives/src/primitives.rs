//! Built-in browser tools.

mod click;
mod navigate;
mod read_dom;
mod type_text;
mod wait;

pub use click::ClickTool;
pub use navigate::NavigateTool;
pub use read_dom::ReadDomTool;
pub use type_text::TypeTextTool;
pub use wait::WaitTool;

use cdp_adapter::SharedSession;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::ToolError;
use crate::types::ToolParams;

/// Decode the raw parameter mapping into a tool's typed parameters.
pub(crate) fn parse_params<T: DeserializeOwned>(tool: &str, params: &ToolParams) -> Result<T, ToolError> {
    serde_json::from_value(Value::Object(params.clone()))
        .map_err(|err| ToolError::invalid_params(tool, err.to_string()))
}

/// Current URL and document title of the session's page.
pub(crate) async fn page_location(session: &SharedSession) -> Result<(String, String), ToolError> {
    let url = session.evaluate("window.location.href").await?;
    let title = session.evaluate("document.title").await?;
    Ok((as_text(url), as_text(title)))
}

fn as_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
