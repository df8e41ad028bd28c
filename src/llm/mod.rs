//! Language-model providers backing the planner.

mod anthropic;
mod openai;

pub use anthropic::{AnthropicConfig, AnthropicProvider};
pub use openai::{OpenAiConfig, OpenAiProvider};

use std::sync::Arc;

use agent_core::{AgentError, LlmProvider, MockLlmProvider};
use tracing::info;

use crate::config::{LlmConfig, ProviderKind};

const OPENAI_DEFAULT_MODEL: &str = "gpt-4o-mini";
const OPENAI_DEFAULT_BASE: &str = "https://api.openai.com/v1";
const ANTHROPIC_DEFAULT_MODEL: &str = "claude-3-sonnet-20240229";
const ANTHROPIC_DEFAULT_BASE: &str = "https://api.anthropic.com/v1";

/// Build the provider selected by `config.provider`.
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, AgentError> {
    let kind = config
        .kind()
        .map_err(|err| AgentError::invalid_request(err.to_string()))?;

    let provider: Arc<dyn LlmProvider> = match kind {
        ProviderKind::OpenAi => Arc::new(OpenAiProvider::new(OpenAiConfig {
            api_key: required_key(config, "OpenAI")?,
            model: model_or(config, OPENAI_DEFAULT_MODEL),
            api_base: base_or(config, OPENAI_DEFAULT_BASE),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout: config.timeout(),
        })?),
        ProviderKind::Anthropic => Arc::new(AnthropicProvider::new(AnthropicConfig {
            api_key: required_key(config, "Anthropic")?,
            model: model_or(config, ANTHROPIC_DEFAULT_MODEL),
            api_base: base_or(config, ANTHROPIC_DEFAULT_BASE),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout: config.timeout(),
        })?),
        ProviderKind::Mock => Arc::new(MockLlmProvider::new()),
    };

    info!(provider = %kind, "Planner provider ready");
    Ok(provider)
}

fn required_key(config: &LlmConfig, vendor: &str) -> Result<String, AgentError> {
    config
        .api_key
        .clone()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| AgentError::invalid_request(format!("missing {vendor} API key for planner")))
}

fn model_or(config: &LlmConfig, default: &str) -> String {
    config.model.clone().unwrap_or_else(|| default.to_string())
}

fn base_or(config: &LlmConfig, default: &str) -> String {
    config.api_base.clone().unwrap_or_else(|| default.to_string())
}
