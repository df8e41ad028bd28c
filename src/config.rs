//! Application configuration.
//!
//! Loaded from YAML (see [`crate::runtime::load_config`]) and then adjusted by
//! a small set of environment overrides.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use action_primitives::ToolSettings;
use agent_core::AgentLoopConfig;
use anyhow::{bail, Result};
use cdp_adapter::CdpConfig;
use serde::{Deserialize, Serialize};

const ENV_PROVIDER: &str = "WEBPILOT_LLM_PROVIDER";
const ENV_MODEL: &str = "WEBPILOT_LLM_MODEL";
const ENV_OPENAI_KEY: &str = "OPENAI_API_KEY";
const ENV_ANTHROPIC_KEY: &str = "ANTHROPIC_API_KEY";
const ENV_HEADLESS: &str = "WEBPILOT_HEADLESS";
const ENV_CHROME_PATH: &str = "WEBPILOT_CHROME_PATH";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub browser: CdpConfig,
    pub llm: LlmConfig,
    pub agent: AgentLoopConfig,
    pub tools: ToolsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// Supported planner backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    Mock,
}

impl FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "anthropic" => Ok(Self::Anthropic),
            "mock" => Ok(Self::Mock),
            other => bail!("Unsupported LLM provider: {other}"),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Mock => "mock",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// `openai`, `anthropic` or `mock`.
    pub provider: String,
    /// Model name; each provider has its own default.
    pub model: Option<String>,
    pub api_key: Option<String>,
    /// Override for the provider's API root, e.g. a compatible gateway.
    pub api_base: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: None,
            api_key: None,
            api_base: None,
            temperature: 0.7,
            max_tokens: 1000,
            timeout_secs: 60,
        }
    }
}

impl LlmConfig {
    pub fn kind(&self) -> Result<ProviderKind> {
        self.provider.parse()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub selector_timeout_ms: u64,
    pub click_settle_ms: u64,
    pub max_wait_secs: u64,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        let defaults = ToolSettings::default();
        Self {
            selector_timeout_ms: defaults.selector_timeout.as_millis() as u64,
            click_settle_ms: defaults.click_settle.as_millis() as u64,
            max_wait_secs: defaults.max_wait.as_secs(),
        }
    }
}

impl ToolsConfig {
    pub fn settings(&self) -> ToolSettings {
        ToolSettings {
            selector_timeout: Duration::from_millis(self.selector_timeout_ms),
            click_settle: Duration::from_millis(self.click_settle_ms),
            max_wait: Duration::from_secs(self.max_wait_secs),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl Config {
    /// Apply environment overrides on top of file values.
    pub fn apply_env_overrides(&mut self) {
        if let Some(provider) = non_empty_env(ENV_PROVIDER) {
            self.llm.provider = provider;
        }
        if let Some(model) = non_empty_env(ENV_MODEL) {
            self.llm.model = Some(model);
        }
        if self.llm.api_key.is_none() {
            let key_var = match self.llm.kind() {
                Ok(ProviderKind::OpenAi) => Some(ENV_OPENAI_KEY),
                Ok(ProviderKind::Anthropic) => Some(ENV_ANTHROPIC_KEY),
                _ => None,
            };
            self.llm.api_key = key_var.and_then(non_empty_env);
        }
        if let Some(headless) = non_empty_env(ENV_HEADLESS) {
            self.browser.headless =
                !matches!(headless.to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off");
        }
        if let Some(path) = non_empty_env(ENV_CHROME_PATH) {
            self.browser.executable = Some(PathBuf::from(path));
        }
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        let kind = self.llm.kind()?;
        if kind != ProviderKind::Mock && self.llm.api_key.as_deref().map_or(true, str::is_empty) {
            bail!("llm.api_key is required for provider {kind}");
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            bail!("llm.temperature must be between 0 and 2");
        }
        if self.llm.max_tokens == 0 {
            bail!("llm.max_tokens must be greater than zero");
        }
        if self.server.host.trim().is_empty() {
            bail!("server.host cannot be empty");
        }
        if self.tools.max_wait_secs == 0 {
            bail!("tools.max_wait_secs must be greater than zero");
        }
        Ok(())
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_names_parse_case_insensitively() {
        assert_eq!("OpenAI".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
        assert_eq!("anthropic".parse::<ProviderKind>().unwrap(), ProviderKind::Anthropic);
        assert_eq!("mock".parse::<ProviderKind>().unwrap(), ProviderKind::Mock);
        let err = "gemini".parse::<ProviderKind>().unwrap_err();
        assert_eq!(err.to_string(), "Unsupported LLM provider: gemini");
    }

    #[test]
    fn tool_settings_follow_config() {
        let tools = ToolsConfig {
            selector_timeout_ms: 500,
            click_settle_ms: 0,
            max_wait_secs: 5,
        };
        let settings = tools.settings();
        assert_eq!(settings.selector_timeout, Duration::from_millis(500));
        assert!(settings.click_settle.is_zero());
        assert_eq!(settings.max_wait, Duration::from_secs(5));
    }

    #[test]
    fn mock_provider_needs_no_key() {
        let mut config = Config::default();
        config.llm.provider = "mock".to_string();
        assert!(config.validate().is_ok());

        config.llm.provider = "openai".to_string();
        config.llm.api_key = None;
        assert!(config.validate().is_err());
    }
}
