use std::sync::Arc;

use action_primitives::ToolDispatcher;
use agent_core::AgentOrchestrator;
use anyhow::{Context, Result};
use cdp_adapter::{CdpConfig, ChromiumSession, SharedSession};
use tracing::info;

use crate::config::Config;
use crate::llm::create_provider;

/// Orchestrator with the built-in tools and the configured planner. No session is attached.
pub fn build_orchestrator(config: &Config) -> Result<AgentOrchestrator> {
    let dispatcher = Arc::new(ToolDispatcher::with_builtin_tools(config.tools.settings()));
    let planner = create_provider(&config.llm).context("Failed to create planner provider")?;
    Ok(AgentOrchestrator::new(config.agent.clone(), dispatcher).with_planner(planner))
}

pub async fn launch_session(config: &CdpConfig) -> Result<SharedSession> {
    let session = ChromiumSession::launch(config)
        .await
        .context("Failed to launch browser")?;
    info!(headless = config.headless, "Browser session launched");
    Ok(Arc::new(session))
}
