//! Orchestrator - runs one goal through the plan-act-observe cycle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use action_primitives::ToolDispatcher;
use cdp_adapter::SharedSession;
use parking_lot::Mutex;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::config::AgentLoopConfig;
use crate::errors::AgentError;
use crate::model::{
    ActionPlan, AgentStep, OrchestratorStatus, StopAck, TaskRequest, TaskResponse, ToolCall,
};
use crate::observation::ObservationBuilder;
use crate::planner::{goal_check_prompt, LlmProvider};

const GOAL_ACHIEVED: &str = "Goal achieved successfully";

#[derive(Debug, Default)]
struct Progress {
    goal: Option<String>,
    steps: usize,
}

/// Drives a single task at a time to a terminal status.
pub struct AgentOrchestrator {
    config: AgentLoopConfig,
    planner: Option<Arc<dyn LlmProvider>>,
    dispatcher: Arc<ToolDispatcher>,
    observer: ObservationBuilder,
    running: AtomicBool,
    progress: Mutex<Progress>,
    cancel: Mutex<Option<CancellationToken>>,
}

/// Clears the run flag and progress when a run ends, even if its future is dropped.
struct RunGuard<'a> {
    owner: &'a AgentOrchestrator,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        *self.owner.progress.lock() = Progress::default();
        self.owner.cancel.lock().take();
        self.owner.running.store(false, Ordering::SeqCst);
    }
}

impl AgentOrchestrator {
    /// Create an orchestrator without a planner; attach one with [`Self::with_planner`].
    pub fn new(config: AgentLoopConfig, dispatcher: Arc<ToolDispatcher>) -> Self {
        let observer = ObservationBuilder::new(config.observation_elements);
        Self {
            config,
            planner: None,
            dispatcher,
            observer,
            running: AtomicBool::new(false),
            progress: Mutex::new(Progress::default()),
            cancel: Mutex::new(None),
        }
    }

    pub fn with_planner(mut self, planner: Arc<dyn LlmProvider>) -> Self {
        self.planner = Some(planner);
        self
    }

    pub fn config(&self) -> &AgentLoopConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &Arc<ToolDispatcher> {
        &self.dispatcher
    }

    pub fn planner_name(&self) -> Option<&str> {
        self.planner.as_deref().map(|planner| planner.name())
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Install `session` for all tools, closing whichever session it replaces.
    pub async fn attach_session(&self, session: SharedSession) {
        if let Some(previous) = self.dispatcher.update_session(Some(session)) {
            if let Err(err) = previous.close().await {
                warn!(error = %err, "Failed to close replaced browser session");
            }
        }
    }

    /// Detach and close the session. Teardown errors are logged, never raised.
    pub async fn shutdown(&self) {
        self.stop();
        match self.dispatcher.update_session(None) {
            Some(session) => match session.close().await {
                Ok(()) => info!("Browser session closed"),
                Err(err) => warn!(error = %err, "Failed to close browser session"),
            },
            None => debug!("Shutdown with no session attached"),
        }
    }

    pub fn status(&self) -> OrchestratorStatus {
        let progress = self.progress.lock();
        OrchestratorStatus {
            running: self.is_running(),
            current_goal: progress.goal.clone(),
            step_count: progress.steps,
            session_ready: self.dispatcher.session_ready(),
            planner_ready: self.planner.is_some(),
        }
    }

    /// Request cancellation of the running task. Observed before the next iteration.
    pub fn stop(&self) -> StopAck {
        let token = self.cancel.lock().clone();
        match token {
            Some(token) if self.is_running() => {
                token.cancel();
                info!("Stop requested for running task");
                StopAck {
                    stopped: true,
                    message: "Task stopped successfully".to_string(),
                }
            }
            _ => StopAck {
                stopped: false,
                message: "No task is currently running".to_string(),
            },
        }
    }

    /// Run `request` to completion. Never fails; errors land in the response.
    pub async fn execute(&self, request: TaskRequest) -> TaskResponse {
        self.execute_with_cancel(request, CancellationToken::new())
            .await
    }

    /// Like [`Self::execute`], observing an external cancellation token.
    pub async fn execute_with_cancel(
        &self,
        request: TaskRequest,
        token: CancellationToken,
    ) -> TaskResponse {
        let started = Instant::now();
        let mut response = TaskResponse::new(request.goal.clone());

        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!(task_id = %response.task_id, "Rejected task while another is running");
            response.fail(AgentError::Busy.to_string());
            response.execution_time = started.elapsed().as_secs_f64();
            return response;
        }
        let _guard = RunGuard { owner: self };
        *self.cancel.lock() = Some(token.clone());
        *self.progress.lock() = Progress {
            goal: Some(request.goal.clone()),
            steps: 0,
        };

        info!(
            task_id = %response.task_id,
            goal = %request.goal,
            max_iterations = request.max_iterations,
            "Starting task"
        );

        if let Err(err) = self.run_loop(&request, &token, started, &mut response).await {
            error!(task_id = %response.task_id, error = %err, "Task failed");
            response.fail(err.to_string());
        }

        if !response.status.is_terminal() {
            let summary = format!("Completed {} steps", response.steps.len());
            response.complete(summary);
        }
        response.execution_time = started.elapsed().as_secs_f64();

        info!(
            task_id = %response.task_id,
            status = ?response.status,
            steps = response.steps.len(),
            execution_time = response.execution_time,
            "Task finished"
        );
        response
    }

    async fn run_loop(
        &self,
        request: &TaskRequest,
        token: &CancellationToken,
        started: Instant,
        response: &mut TaskResponse,
    ) -> Result<(), AgentError> {
        if request.goal.trim().is_empty() {
            return Err(AgentError::invalid_request("goal cannot be empty"));
        }
        let planner = self
            .planner
            .clone()
            .ok_or(AgentError::PlannerUnavailable)?;

        // A budget too large to represent as an instant means no deadline.
        let deadline = (self.config.enforce_timeout && request.timeout > 0)
            .then(|| started.checked_add(Duration::from_secs(request.timeout)))
            .flatten();
        let step_delay = Duration::from_millis(self.config.step_delay_ms);
        let tools = self.dispatcher.available_tools();

        for step_number in 1..=request.max_iterations {
            if token.is_cancelled() {
                info!(task_id = %response.task_id, step = step_number, "Task stopped");
                response.stop();
                return Ok(());
            }
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                return Err(AgentError::Timeout(request.timeout));
            }

            let observation = self.observer.observe(&self.dispatcher).await;
            debug!(task_id = %response.task_id, step = step_number, observation = %observation, "Observed page");

            let history = self.recent_rationales(&response.steps);
            let plan = match planner
                .plan_next_action(&request.goal, &observation, &history, &tools)
                .await
            {
                Ok(plan) => plan,
                Err(err) => {
                    warn!(task_id = %response.task_id, step = step_number, error = %err, "Planning failed");
                    ActionPlan::degraded(&err)
                }
            };

            let outcome = self
                .dispatcher
                .dispatch(&plan.tool_name, &plan.parameters)
                .await?;

            info!(
                task_id = %response.task_id,
                step = step_number,
                tool = %plan.tool_name,
                success = outcome.success,
                "Step executed"
            );

            let step_error = outcome.error.clone();
            response.steps.push(AgentStep {
                step_number,
                planning: plan.reasoning,
                tool_call: ToolCall {
                    tool_name: plan.tool_name,
                    parameters: plan.parameters,
                    result: outcome.result,
                    error: outcome.error,
                },
                observation,
                success: outcome.success,
            });
            self.progress.lock().steps = response.steps.len();

            let achieved = match response.steps.last() {
                Some(step) => {
                    self.goal_achieved(planner.as_ref(), &request.goal, &step.observation)
                        .await
                }
                None => false,
            };
            if achieved {
                response.complete(GOAL_ACHIEVED);
                return Ok(());
            }

            if !outcome.success && step_number >= self.config.failure_abort_step {
                let reason = step_error.unwrap_or_else(|| "unknown error".to_string());
                warn!(task_id = %response.task_id, step = step_number, error = %reason, "Aborting after repeated failures");
                response.fail(format!("Multiple failures: {reason}"));
                return Ok(());
            }

            if !step_delay.is_zero() {
                tokio::time::sleep(step_delay).await;
            }
        }

        Ok(())
    }

    fn recent_rationales(&self, steps: &[AgentStep]) -> Vec<String> {
        let skip = steps.len().saturating_sub(self.config.history_window);
        steps[skip..].iter().map(|step| step.planning.clone()).collect()
    }

    async fn goal_achieved(&self, planner: &dyn LlmProvider, goal: &str, observation: &str) -> bool {
        let prompt = goal_check_prompt(goal, observation);
        match planner.generate_response(&prompt, None).await {
            Ok(answer) => answer.to_uppercase().contains("YES"),
            Err(err) => {
                warn!(error = %err, "Goal check failed");
                false
            }
        }
    }
}

impl std::fmt::Debug for AgentOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentOrchestrator")
            .field("config", &self.config)
            .field("planner", &self.planner_name())
            .field("running", &self.is_running())
            .finish()
    }
}
