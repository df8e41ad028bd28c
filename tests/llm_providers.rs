use std::sync::Arc;
use std::time::Duration;

use agent_core::LlmProvider;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use webpilot::llm::{AnthropicConfig, AnthropicProvider, OpenAiConfig, OpenAiProvider};

#[derive(Clone, Default)]
struct Captured {
    requests: Arc<Mutex<Vec<(HeaderMap, Value)>>>,
}

impl Captured {
    fn last(&self) -> (HeaderMap, Value) {
        self.requests.lock().last().cloned().unwrap()
    }
}

async fn openai_handler(
    State(captured): State<Captured>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    captured.requests.lock().push((headers, body));
    Json(json!({
        "id": "chatcmpl-1",
        "choices": [{"index": 0, "message": {"role": "assistant", "content": "{\"tool_name\": \"wait\"}"}}]
    }))
}

async fn anthropic_handler(
    State(captured): State<Captured>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    captured.requests.lock().push((headers, body));
    Json(json!({
        "id": "msg_1",
        "content": [{"type": "text", "text": "YES"}]
    }))
}

async fn rejecting_handler() -> impl IntoResponse {
    (StatusCode::UNAUTHORIZED, "invalid api key")
}

async fn spawn_mock() -> (String, Captured) {
    let captured = Captured::default();
    let app = Router::new()
        .route("/v1/chat/completions", post(openai_handler))
        .route("/v1/messages", post(anthropic_handler))
        .route("/denied/chat/completions", post(rejecting_handler))
        .with_state(captured.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), captured)
}

fn openai(api_base: String) -> OpenAiProvider {
    OpenAiProvider::new(OpenAiConfig {
        api_key: "sk-test".to_string(),
        model: "gpt-test".to_string(),
        api_base,
        temperature: 0.7,
        max_tokens: 1000,
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

#[tokio::test]
async fn openai_sends_bearer_and_context() {
    let (base, captured) = spawn_mock().await;
    let provider = openai(format!("{base}/v1"));

    let reply = provider
        .generate_response("Pick a tool", Some(&json!({"url": "https://example.com/"})))
        .await
        .unwrap();
    assert_eq!(reply, "{\"tool_name\": \"wait\"}");

    let (headers, body) = captured.last();
    assert_eq!(headers["authorization"], "Bearer sk-test");
    assert_eq!(body["model"], "gpt-test");
    assert_eq!(body["max_tokens"], 1000);
    assert_eq!(body["messages"][0]["role"], "system");
    assert!(body["messages"][0]["content"]
        .as_str()
        .unwrap()
        .starts_with("Context: {"));
    assert_eq!(body["messages"][1]["content"], "Pick a tool");
}

#[tokio::test]
async fn openai_error_status_is_reported() {
    let (base, _captured) = spawn_mock().await;
    let provider = openai(format!("{base}/denied"));

    let err = provider.generate_response("hello", None).await.unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("llm request failed: openai returned 401"));
    assert!(message.contains("invalid api key"));
}

#[tokio::test]
async fn anthropic_sends_version_and_key_headers() {
    let (base, captured) = spawn_mock().await;
    let provider = AnthropicProvider::new(AnthropicConfig {
        api_key: "anthropic-key".to_string(),
        model: "claude-test".to_string(),
        api_base: format!("{base}/v1/"),
        temperature: 0.7,
        max_tokens: 1000,
        timeout: Duration::from_secs(5),
    })
    .unwrap();

    let reply = provider
        .generate_response("Has it worked?", Some(&json!({"step": 1})))
        .await
        .unwrap();
    assert_eq!(reply, "YES");

    let (headers, body) = captured.last();
    assert_eq!(headers["x-api-key"], "anthropic-key");
    assert_eq!(headers["anthropic-version"], "2023-06-01");
    assert_eq!(body["model"], "claude-test");
    let text = body["messages"][0]["content"][0]["text"].as_str().unwrap();
    assert!(text.starts_with("Context: {"));
    assert!(text.ends_with("\n\nHas it worked?"));
}

#[tokio::test]
async fn planner_goes_through_provider_and_decoder() {
    let (base, _captured) = spawn_mock().await;
    let provider = openai(format!("{base}/v1"));

    let plan = provider
        .plan_next_action("Wait a bit", "Browser not initialized", &[], &Default::default())
        .await
        .unwrap();
    assert_eq!(plan.tool_name, "wait");
}
