use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use cdp_adapter::SharedSession;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::errors::ToolError;
use crate::primitives::{ClickTool, NavigateTool, ReadDomTool, TypeTextTool, WaitTool};
use crate::session_slot::SessionSlot;
use crate::types::{ToolOutcome, ToolParams, ToolSettings};

/// A named browser capability the planner can invoke.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    /// One-line description surfaced to the planner.
    fn description(&self) -> &str;

    async fn execute(&self, params: &ToolParams) -> Result<Value, ToolError>;
}

/// Name-keyed registry that turns tool invocations into [`ToolOutcome`]s.
pub struct ToolDispatcher {
    tools: HashMap<String, Arc<dyn Tool>>,
    session: SessionSlot,
}

impl Default for ToolDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolDispatcher {
    /// Empty dispatcher with a detached session slot.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            session: SessionSlot::new(),
        }
    }

    /// Dispatcher pre-populated with navigate, click, type, read_dom and wait.
    pub fn with_builtin_tools(settings: ToolSettings) -> Self {
        let mut dispatcher = Self::new();
        let slot = dispatcher.session.clone();
        dispatcher.register(Arc::new(NavigateTool::new(slot.clone())));
        dispatcher.register(Arc::new(ClickTool::new(slot.clone(), settings)));
        dispatcher.register(Arc::new(TypeTextTool::new(slot.clone(), settings)));
        dispatcher.register(Arc::new(ReadDomTool::new(slot)));
        dispatcher.register(Arc::new(WaitTool::new(settings.max_wait)));
        dispatcher
    }

    /// Register a tool, replacing any previous tool with the same name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        if self.tools.insert(name.clone(), tool).is_some() {
            warn!(tool = %name, "Replaced previously registered tool");
        } else {
            debug!(tool = %name, "Registered tool");
        }
    }

    /// Swap the session used by every session-bound tool.
    pub fn update_session(&self, session: Option<SharedSession>) -> Option<SharedSession> {
        info!(attached = session.is_some(), "Updating tool session");
        self.session.replace(session)
    }

    pub fn session_ready(&self) -> bool {
        self.session.is_ready()
    }

    /// Slot shared with session-bound tools; custom tools may clone it.
    pub fn session_slot(&self) -> SessionSlot {
        self.session.clone()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Tool name to description, sorted by name.
    pub fn available_tools(&self) -> BTreeMap<String, String> {
        self.tools
            .iter()
            .map(|(name, tool)| (name.clone(), tool.description().to_string()))
            .collect()
    }

    /// Run `name` with `params`.
    ///
    /// Unknown tools and handler failures come back as a failed outcome. Only
    /// fatal errors (no session attached) are returned as `Err`.
    pub async fn dispatch(&self, name: &str, params: &ToolParams) -> Result<ToolOutcome, ToolError> {
        let Some(tool) = self.tools.get(name).cloned() else {
            warn!(tool = %name, "Planner requested an unknown tool");
            return Ok(ToolOutcome::failure(format!("unknown tool: {name}")));
        };

        debug!(tool = %name, params = ?params, "Dispatching tool");
        match tool.execute(params).await {
            Ok(result) => Ok(ToolOutcome::ok(result)),
            Err(err) if err.is_fatal() => Err(err),
            Err(err) => {
                warn!(tool = %name, error = %err, "Tool execution failed");
                Ok(ToolOutcome::failure(err.to_string()))
            }
        }
    }
}

impl std::fmt::Debug for ToolDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDispatcher")
            .field("tools", &self.available_tools().keys().collect::<Vec<_>>())
            .field("session", &self.session)
            .finish()
    }
}
