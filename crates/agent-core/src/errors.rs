use action_primitives::ToolError;
use thiserror::Error;

/// Errors emitted by the agent-core crate.
///
/// None of these escape [`crate::AgentOrchestrator::execute`]; they are
/// folded into the task record's `error` field.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Raised when an agent request is malformed or missing required fields.
    #[error("invalid agent request: {0}")]
    InvalidRequest(String),

    /// No planner was configured for the orchestrator.
    #[error("planner not configured")]
    PlannerUnavailable,

    /// The language model call itself failed (transport, auth, empty reply).
    #[error("llm request failed: {0}")]
    Llm(String),

    /// A tool failure severe enough to end the task.
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// Another task already owns the orchestrator.
    #[error("another task is already running")]
    Busy,

    /// The request's time budget ran out.
    #[error("task exceeded timeout of {0}s")]
    Timeout(u64),
}

impl AgentError {
    /// Helper for wrapping static string errors.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Helper for provider failures.
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm(message.into())
    }
}
