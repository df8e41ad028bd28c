//! Task records exchanged with callers of the orchestrator.

use action_primitives::ToolParams;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Optional hint describing what kind of task was submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Navigate,
    Click,
    Type,
    ReadDom,
    #[default]
    Custom,
}

fn default_max_iterations() -> u32 {
    10
}

fn default_timeout() -> u64 {
    300
}

/// A goal submitted for autonomous execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRequest {
    pub goal: String,
    #[serde(default)]
    pub task_type: TaskType,
    #[serde(default)]
    pub parameters: ToolParams,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    /// Time budget in seconds. When `AgentLoopConfig::enforce_timeout` is set
    /// it is checked at the top of each iteration; `0` means no deadline.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl TaskRequest {
    pub fn new(goal: impl Into<String>) -> Self {
        Self {
            goal: goal.into(),
            task_type: TaskType::default(),
            parameters: ToolParams::new(),
            max_iterations: default_max_iterations(),
            timeout: default_timeout(),
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }
}

/// The tool invocation made during one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub tool_name: String,
    #[serde(default)]
    pub parameters: ToolParams,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

/// One executed iteration of the loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentStep {
    pub step_number: u32,
    /// Planner rationale for the chosen action.
    pub planning: String,
    pub tool_call: ToolCall,
    /// Observation the planner saw before choosing the action.
    pub observation: String,
    pub success: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Running,
    Completed,
    Failed,
    Stopped,
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, TaskStatus::Running)
    }
}

/// Record of a task run, returned when the loop exits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResponse {
    pub task_id: String,
    pub goal: String,
    pub status: TaskStatus,
    pub steps: Vec<AgentStep>,
    pub final_result: Option<String>,
    pub error: Option<String>,
    /// Wall-clock seconds spent in the loop.
    pub execution_time: f64,
}

impl TaskResponse {
    /// Fresh record in the `running` state.
    pub fn new(goal: impl Into<String>) -> Self {
        Self {
            task_id: Uuid::new_v4().to_string(),
            goal: goal.into(),
            status: TaskStatus::Running,
            steps: Vec::new(),
            final_result: None,
            error: None,
            execution_time: 0.0,
        }
    }

    // Terminal states are sticky; the first transition wins.
    fn settle(&mut self, status: TaskStatus) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = status;
        true
    }

    pub fn complete(&mut self, result: impl Into<String>) {
        if self.settle(TaskStatus::Completed) {
            self.final_result = Some(result.into());
        }
    }

    pub fn fail(&mut self, error: impl Into<String>) {
        if self.settle(TaskStatus::Failed) {
            self.error = Some(error.into());
        }
    }

    pub fn stop(&mut self) {
        self.settle(TaskStatus::Stopped);
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, TaskStatus::Completed)
    }
}

fn default_tool_name() -> String {
    "wait".to_string()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_default_tool<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_tool_name))
}

/// Structured decision produced by the planner.
///
/// Missing or `null` fields take their defaults. Keys other than the four
/// below are dropped when decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionPlan {
    #[serde(default, deserialize_with = "null_as_default")]
    pub reasoning: String,
    #[serde(default = "default_tool_name", deserialize_with = "null_as_default_tool")]
    pub tool_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub parameters: ToolParams,
    #[serde(default, deserialize_with = "null_as_default")]
    pub expected_outcome: String,
}

impl ActionPlan {
    /// Plan used when planner output cannot be decoded.
    pub fn fallback() -> Self {
        Self::wait("parse failure", 1, "wait and retry")
    }

    /// Plan used when the planner call itself failed.
    pub fn degraded(reason: &impl std::fmt::Display) -> Self {
        Self::wait(format!("Planning failed: {reason}. Waiting."), 2, "Wait and retry")
    }

    fn wait(reasoning: impl Into<String>, seconds: u64, expected_outcome: &str) -> Self {
        let mut parameters = ToolParams::new();
        parameters.insert("seconds".to_string(), Value::from(seconds));
        Self {
            reasoning: reasoning.into(),
            tool_name: default_tool_name(),
            parameters,
            expected_outcome: expected_outcome.to_string(),
        }
    }
}

/// Snapshot answered by [`crate::AgentOrchestrator::status`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestratorStatus {
    pub running: bool,
    pub current_goal: Option<String>,
    pub step_count: usize,
    pub session_ready: bool,
    pub planner_ready: bool,
}

/// Acknowledgement returned by [`crate::AgentOrchestrator::stop`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopAck {
    pub stopped: bool,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_defaults_apply() {
        let request: TaskRequest = serde_json::from_value(json!({"goal": "open docs"})).unwrap();
        assert_eq!(request.task_type, TaskType::Custom);
        assert_eq!(request.max_iterations, 10);
        assert_eq!(request.timeout, 300);
        assert!(request.parameters.is_empty());
    }

    #[test]
    fn task_type_uses_snake_case() {
        let request: TaskRequest =
            serde_json::from_value(json!({"goal": "x", "task_type": "read_dom"})).unwrap();
        assert_eq!(request.task_type, TaskType::ReadDom);
    }

    #[test]
    fn terminal_status_is_sticky() {
        let mut response = TaskResponse::new("goal");
        response.stop();
        response.complete("done");
        response.fail("boom");
        assert_eq!(response.status, TaskStatus::Stopped);
        assert!(response.final_result.is_none());
        assert!(response.error.is_none());
    }

    #[test]
    fn status_serializes_lowercase() {
        let mut response = TaskResponse::new("goal");
        response.complete("ok");
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["status"], "completed");
        assert_eq!(value["final_result"], "ok");
        assert!(Uuid::parse_str(value["task_id"].as_str().unwrap()).is_ok());
    }

    #[test]
    fn degraded_plan_waits_two_seconds() {
        let plan = ActionPlan::degraded(&"connection reset");
        assert_eq!(plan.reasoning, "Planning failed: connection reset. Waiting.");
        assert_eq!(plan.tool_name, "wait");
        assert_eq!(plan.parameters["seconds"], 2);
        assert_eq!(plan.expected_outcome, "Wait and retry");
    }
}
