//! Error types for tool execution

use cdp_adapter::SessionError;
use thiserror::Error;

/// Failures raised by a tool handler.
///
/// All variants except [`ToolError::SessionUnavailable`] are folded into a
/// failed [`crate::ToolOutcome`] by the dispatcher.
#[derive(Debug, Clone, Error)]
pub enum ToolError {
    /// No session has been attached to the dispatcher.
    #[error("browser session not initialized")]
    SessionUnavailable,

    /// The planner supplied parameters the tool cannot use.
    #[error("invalid parameters for {tool}: {reason}")]
    InvalidParams { tool: String, reason: String },

    /// The session rejected or failed the operation.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Internal error (should not happen in normal operation)
    #[error("internal error: {0}")]
    Internal(String),
}

impl ToolError {
    pub fn invalid_params(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParams {
            tool: tool.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error should abort the whole task instead of one step.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ToolError::SessionUnavailable)
    }
}
