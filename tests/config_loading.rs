use std::env;
use std::fs;

use serial_test::serial;
use tempfile::TempDir;

use webpilot::config::ProviderKind;
use webpilot::runtime::load_config;

const ENV_KEYS: [&str; 6] = [
    "WEBPILOT_LLM_PROVIDER",
    "WEBPILOT_LLM_MODEL",
    "OPENAI_API_KEY",
    "ANTHROPIC_API_KEY",
    "WEBPILOT_HEADLESS",
    "WEBPILOT_CHROME_PATH",
];

fn clear_env() {
    for key in ENV_KEYS {
        env::remove_var(key);
    }
}

fn write_config(dir: &TempDir, yaml: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.yaml");
    fs::write(&path, yaml).unwrap();
    path
}

#[tokio::test]
#[serial]
async fn explicit_file_is_parsed() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
server:
  port: 9100
llm:
  provider: anthropic
  api_key: file-key
  max_tokens: 512
agent:
  step_delay_ms: 0
  history_window: 3
tools:
  max_wait_secs: 5
logging:
  json: true
"#,
    );

    let loaded = load_config(Some(&path)).await.unwrap();
    assert!(loaded.found);
    assert_eq!(loaded.path, path);

    let config = loaded.config;
    assert_eq!(config.server.port, 9100);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.llm.kind().unwrap(), ProviderKind::Anthropic);
    assert_eq!(config.llm.api_key.as_deref(), Some("file-key"));
    assert_eq!(config.llm.max_tokens, 512);
    assert_eq!(config.agent.step_delay_ms, 0);
    assert_eq!(config.agent.history_window, 3);
    assert_eq!(config.agent.failure_abort_step, 3);
    assert_eq!(config.tools.max_wait_secs, 5);
    assert!(config.logging.json);
    assert!(config.validate().is_ok());
}

#[tokio::test]
#[serial]
async fn missing_file_falls_back_to_defaults() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.yaml");

    let loaded = load_config(Some(&path)).await.unwrap();
    assert!(!loaded.found);
    assert_eq!(loaded.config.server.port, 8000);
    assert_eq!(loaded.config.llm.provider, "openai");
    assert!(loaded.config.llm.api_key.is_none());
    assert!(loaded.config.validate().is_err());
}

#[tokio::test]
#[serial]
async fn invalid_yaml_is_an_error() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "server: [not, a, map");

    let err = load_config(Some(&path)).await.err().unwrap();
    assert!(err.to_string().contains("Failed to parse config file"));
}

#[tokio::test]
#[serial]
async fn environment_overrides_file_values() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
llm:
  provider: mock
browser:
  headless: true
"#,
    );

    env::set_var("WEBPILOT_LLM_PROVIDER", "openai");
    env::set_var("WEBPILOT_LLM_MODEL", "gpt-test");
    env::set_var("OPENAI_API_KEY", "env-key");
    env::set_var("WEBPILOT_HEADLESS", "false");
    env::set_var("WEBPILOT_CHROME_PATH", "/opt/chrome/chrome");

    let config = load_config(Some(&path)).await.unwrap().config;
    clear_env();

    assert_eq!(config.llm.kind().unwrap(), ProviderKind::OpenAi);
    assert_eq!(config.llm.model.as_deref(), Some("gpt-test"));
    assert_eq!(config.llm.api_key.as_deref(), Some("env-key"));
    assert!(!config.browser.headless);
    assert_eq!(
        config.browser.executable.as_deref(),
        Some(std::path::Path::new("/opt/chrome/chrome"))
    );
}

#[tokio::test]
#[serial]
async fn file_key_wins_over_environment_key() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
llm:
  provider: openai
  api_key: file-key
"#,
    );
    env::set_var("OPENAI_API_KEY", "env-key");

    let config = load_config(Some(&path)).await.unwrap().config;
    clear_env();

    assert_eq!(config.llm.api_key.as_deref(), Some("file-key"));
}
