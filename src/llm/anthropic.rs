use std::time::Duration;

use agent_core::planner::render_context;
use agent_core::{AgentError, LlmProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

/// Messages API client. Context is prepended to the user prompt.
pub struct AnthropicProvider {
    client: Client,
    config: AnthropicConfig,
}

impl AnthropicProvider {
    pub fn new(config: AnthropicConfig) -> Result<Self, AgentError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| {
                AgentError::invalid_request(format!("failed to build HTTP client: {err}"))
            })?;
        Ok(Self { client, config })
    }

    fn build_request(&self, prompt: &str, context: Option<&Value>) -> ClaudeRequest {
        let text = match context {
            Some(context) => format!("{}\n\n{prompt}", render_context(context)),
            None => prompt.to_string(),
        };
        ClaudeRequest {
            model: self.config.model.clone(),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            messages: vec![ClaudeMessage {
                role: "user".to_string(),
                content: vec![ClaudeContent {
                    kind: "text".to_string(),
                    text,
                }],
            }],
        }
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn generate_response(
        &self,
        prompt: &str,
        context: Option<&Value>,
    ) -> Result<String, AgentError> {
        let url = format!("{}/messages", self.config.api_base.trim_end_matches('/'));
        let body = self.build_request(prompt, context);

        debug!(target: "anthropic", model = %body.model, prompt_chars = prompt.len(), "Sending messages request");
        let response = self
            .client
            .post(url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|err| AgentError::llm(format!("claude request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "<response unavailable>".to_string());
            warn!(target: "anthropic", %status, raw = %text, "Anthropic returned an error status");
            return Err(AgentError::llm(format!("claude returned {status}: {text}")));
        }

        let response: ClaudeResponse = response
            .json()
            .await
            .map_err(|err| AgentError::llm(format!("claude response invalid: {err}")))?;

        let content = response
            .content
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect::<Vec<_>>()
            .join("\n");

        if content.is_empty() {
            return Err(AgentError::llm("claude response missing content"));
        }
        Ok(content)
    }
}

#[derive(Debug, Serialize)]
struct ClaudeRequest {
    model: String,
    temperature: f32,
    max_tokens: u32,
    messages: Vec<ClaudeMessage>,
}

#[derive(Debug, Serialize)]
struct ClaudeMessage {
    role: String,
    content: Vec<ClaudeContent>,
}

#[derive(Debug, Serialize)]
struct ClaudeContent {
    #[serde(rename = "type")]
    kind: String,
    text: String,
}

#[derive(Debug, Deserialize)]
struct ClaudeResponse {
    #[serde(default)]
    content: Vec<ClaudeResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ClaudeResponseContent {
    #[serde(default)]
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn context_is_prepended_to_prompt() {
        let provider = AnthropicProvider::new(AnthropicConfig {
            api_key: "key".to_string(),
            model: "claude-test".to_string(),
            api_base: "http://localhost".to_string(),
            temperature: 0.7,
            max_tokens: 1000,
            timeout: Duration::from_secs(5),
        })
        .unwrap();

        let request = provider.build_request("Go on", Some(&json!({"a": 1})));
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"][0]["type"], "text");
        assert_eq!(
            body["messages"][0]["content"][0]["text"],
            "Context: {\n  \"a\": 1\n}\n\nGo on"
        );
    }
}
