//! Agent core for WebPilot.
//!
//! Provides the task data model, the planner adapter with its tolerant plan
//! decoder, the observation builder and the plan-act-observe orchestrator.

pub mod agent_loop;
pub mod errors;
pub mod model;
pub mod observation;
pub mod planner;

pub use agent_loop::{AgentLoopConfig, AgentOrchestrator};
pub use errors::AgentError;
pub use model::{
    ActionPlan, AgentStep, OrchestratorStatus, StopAck, TaskRequest, TaskResponse, TaskStatus,
    TaskType, ToolCall,
};
pub use observation::ObservationBuilder;
pub use planner::{decode_plan, LlmProvider, MockLlmProvider};
