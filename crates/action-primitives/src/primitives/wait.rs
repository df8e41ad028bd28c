use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::dispatcher::Tool;
use crate::errors::ToolError;
use crate::types::ToolParams;

const DEFAULT_SECONDS: f64 = 1.0;

/// Pause for a number of seconds. Never needs a session and never fails.
pub struct WaitTool {
    max_wait: Duration,
}

impl WaitTool {
    pub fn new(max_wait: Duration) -> Self {
        Self { max_wait }
    }

    /// Requested duration, accepting numbers or numeric strings, clamped to `[0, max_wait]`.
    fn requested(&self, params: &ToolParams) -> Duration {
        let seconds = match params.get("seconds") {
            Some(Value::Number(number)) => number.as_f64().unwrap_or(DEFAULT_SECONDS),
            Some(Value::String(text)) => text.trim().parse().unwrap_or(DEFAULT_SECONDS),
            _ => DEFAULT_SECONDS,
        };
        if !seconds.is_finite() || seconds <= 0.0 {
            return Duration::ZERO;
        }
        let capped = seconds.min(self.max_wait.as_secs_f64());
        Duration::try_from_secs_f64(capped).unwrap_or(self.max_wait)
    }
}

#[async_trait]
impl Tool for WaitTool {
    fn name(&self) -> &str {
        "wait"
    }

    fn description(&self) -> &str {
        "Wait for a specified time. Parameters: seconds (number)"
    }

    async fn execute(&self, params: &ToolParams) -> Result<Value, ToolError> {
        let duration = self.requested(params);
        debug!(seconds = duration.as_secs_f64(), "Executing wait primitive");
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
        Ok(json!({ "message": format!("Waited for {} seconds", duration.as_secs_f64()) }))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn params(value: Value) -> ToolParams {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn accepts_numbers_and_numeric_strings() {
        let tool = WaitTool::new(Duration::from_secs(60));
        assert_eq!(tool.requested(&params(json!({"seconds": 2}))), Duration::from_secs(2));
        assert_eq!(tool.requested(&params(json!({"seconds": "0.5"}))), Duration::from_millis(500));
        assert_eq!(tool.requested(&params(json!({}))), Duration::from_secs(1));
        assert_eq!(tool.requested(&params(json!({"seconds": "soon"}))), Duration::from_secs(1));
    }

    #[test]
    fn clamps_to_bounds() {
        let tool = WaitTool::new(Duration::from_secs(5));
        assert_eq!(tool.requested(&params(json!({"seconds": -3}))), Duration::ZERO);
        assert_eq!(tool.requested(&params(json!({"seconds": 600}))), Duration::from_secs(5));
        assert_eq!(tool.requested(&params(json!({"seconds": 1e30}))), Duration::from_secs(5));
        assert_eq!(tool.requested(&params(json!({"seconds": "1e300"}))), Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn sleeps_and_reports() {
        let tool = WaitTool::new(Duration::from_secs(60));
        let started = tokio::time::Instant::now();
        let result = tool.execute(&params(json!({"seconds": 2}))).await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(2));
        assert_eq!(result["message"], "Waited for 2 seconds");
    }
}
