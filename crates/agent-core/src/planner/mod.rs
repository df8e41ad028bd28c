//! Planner adapter: provider abstraction, prompts and plan decoding.

mod decode;
mod mock;
mod prompt;

pub use decode::decode_plan;
pub use mock::MockLlmProvider;
pub use prompt::{goal_check_prompt, planning_prompt, render_context, GOAL_CHECK_QUESTION};

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::AgentError;
use crate::model::ActionPlan;

/// Abstraction over LLM-backed planners so multiple vendors can plug into the agent core.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Short provider name used in logs and health output.
    fn name(&self) -> &str;

    /// Free-form completion. `context`, when given, is framed ahead of the prompt.
    async fn generate_response(
        &self,
        prompt: &str,
        context: Option<&Value>,
    ) -> Result<String, AgentError>;

    /// Choose the next action.
    ///
    /// Transport failures are returned as errors; malformed replies are not,
    /// they decode to the fallback wait plan.
    async fn plan_next_action(
        &self,
        goal: &str,
        observation: &str,
        history: &[String],
        tools: &BTreeMap<String, String>,
    ) -> Result<ActionPlan, AgentError> {
        let prompt = planning_prompt(goal, observation, history, tools);
        let raw = self.generate_response(&prompt, None).await?;
        Ok(decode_plan(&raw))
    }
}
