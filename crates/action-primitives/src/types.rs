//! Core data types for tool execution

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Parameter mapping handed to a tool.
pub type ToolParams = Map<String, Value>;

/// Uniform result of dispatching a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolOutcome {
    pub fn ok(result: Value) -> Self {
        Self {
            success: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(error.into()),
        }
    }
}

/// One interactive element found on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractiveElement {
    /// `button`, `link` or `input_<type>`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Best-effort CSS locator.
    pub selector: String,
}

impl InteractiveElement {
    /// Human label: text, then placeholder, then `N/A`.
    pub fn label(&self) -> &str {
        self.text
            .as_deref()
            .filter(|value| !value.is_empty())
            .or_else(|| self.placeholder.as_deref().filter(|value| !value.is_empty()))
            .unwrap_or("N/A")
    }
}

/// Bounded summary of the current page produced by `read_dom`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageDigest {
    pub url: String,
    pub title: String,
    pub text_preview: String,
    pub interactive_elements: Vec<InteractiveElement>,
    pub total_text_length: usize,
}

/// Timing knobs shared by the built-in tools.
#[derive(Debug, Clone, Copy)]
pub struct ToolSettings {
    /// How long click/type wait for their selector.
    pub selector_timeout: Duration,
    /// Pause after a click so navigation or re-rendering can start.
    pub click_settle: Duration,
    /// Upper bound for the `wait` tool.
    pub max_wait: Duration,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            selector_timeout: Duration::from_secs(10),
            click_settle: Duration::from_secs(1),
            max_wait: Duration::from_secs(60),
        }
    }
}

impl ToolSettings {
    /// Settings with no built-in pauses, for tests and fixtures.
    pub fn immediate() -> Self {
        Self {
            selector_timeout: Duration::from_millis(50),
            click_settle: Duration::ZERO,
            max_wait: Duration::from_secs(1),
        }
    }
}
