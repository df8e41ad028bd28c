use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};

use super::prompt::GOAL_CHECK_QUESTION;
use super::LlmProvider;
use crate::errors::AgentError;
use crate::model::ActionPlan;

static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://[^\s"'<>]+"#).expect("url pattern is valid"));

/// Deterministic provider used for tests and offline development.
///
/// Navigates to the first URL mentioned in the goal, then reads the page, and
/// reports the goal as achieved once the observation shows that URL.
#[derive(Debug, Default, Clone)]
pub struct MockLlmProvider;

impl MockLlmProvider {
    pub fn new() -> Self {
        Self
    }

    fn plan_for(&self, prompt: &str) -> ActionPlan {
        match target_url(prompt) {
            Some(target) if !reached(prompt, &target) => ActionPlan {
                reasoning: format!("Open {target} to work on the goal"),
                tool_name: "navigate".to_string(),
                parameters: json_params(json!({ "url": target })),
                expected_outcome: format!("Browser shows {target}"),
            },
            _ => ActionPlan {
                reasoning: "Inspect the current page".to_string(),
                tool_name: "read_dom".to_string(),
                parameters: Default::default(),
                expected_outcome: "Page structure is known".to_string(),
            },
        }
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate_response(
        &self,
        prompt: &str,
        _context: Option<&Value>,
    ) -> Result<String, AgentError> {
        if prompt.trim().is_empty() {
            return Err(AgentError::invalid_request("prompt cannot be empty"));
        }

        if prompt.contains(GOAL_CHECK_QUESTION) {
            let achieved = target_url(prompt).is_some_and(|target| reached(prompt, &target));
            return Ok(if achieved { "YES" } else { "NO" }.to_string());
        }

        serde_json::to_string(&self.plan_for(prompt)).map_err(|err| AgentError::llm(err.to_string()))
    }
}

fn json_params(value: Value) -> action_primitives::ToolParams {
    match value {
        Value::Object(map) => map,
        _ => Default::default(),
    }
}

fn target_url(prompt: &str) -> Option<String> {
    prompt
        .lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix("GOAL:").or_else(|| line.strip_prefix("Goal:")))
        .and_then(|goal| URL_PATTERN.find(goal))
        .map(|found| {
            found
                .as_str()
                .trim_end_matches(|c: char| matches!(c, '.' | ',' | ';' | ')'))
                .to_string()
        })
}

fn reached(prompt: &str, target: &str) -> bool {
    prompt
        .lines()
        .filter_map(|line| line.trim().strip_prefix("Current URL:"))
        .any(|current| same_page(current.trim(), target))
}

fn same_page(left: &str, right: &str) -> bool {
    left.trim_end_matches('/') == right.trim_end_matches('/')
}
