use agent_core::{
    AgentError, OrchestratorStatus, StopAck, TaskRequest, TaskResponse, TaskStatus,
};
use axum::{
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use super::state::ServeState;

pub fn build_router(state: ServeState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/agent/execute", post(execute_handler))
        .route("/agent/status", get(status_handler))
        .route("/agent/stop", post(stop_handler))
        .route("/agent/tools", get(tools_handler))
        .layer(cors_layer())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

/// JSON error body `{ "error": ... }` with a status code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

async fn root_handler() -> Json<Value> {
    Json(json!({
        "message": "WebPilot agent API is running",
        "status": "healthy",
    }))
}

async fn health_handler(State(state): State<ServeState>) -> Json<Value> {
    let snapshot = state.health_snapshot();
    let status = state.orchestrator.status();
    Json(json!({
        "status": "ok",
        "live": snapshot.live,
        "session_ready": status.session_ready,
        "planner": state.orchestrator.planner_name(),
        "running": status.running,
        "started_at": snapshot.started_at,
        "tasks_total": snapshot.tasks_total,
        "tasks_failed": snapshot.tasks_failed,
        "last_error": snapshot.last_error,
    }))
}

async fn execute_handler(
    State(state): State<ServeState>,
    Json(request): Json<TaskRequest>,
) -> Result<Json<TaskResponse>, ApiError> {
    if state.orchestrator.is_running() {
        warn!(goal = %request.goal, "Rejecting task submission while busy");
        return Err(ApiError::conflict(AgentError::Busy.to_string()));
    }

    info!(goal = %request.goal, "Task submitted over HTTP");
    let response = state.orchestrator.execute(request).await;
    // Lost the race for the run flag to a concurrent submission.
    if is_busy_rejection(&response) {
        warn!(task_id = %response.task_id, "Task submission raced a running task");
        return Err(ApiError::conflict(AgentError::Busy.to_string()));
    }
    state.record_task(&response);
    Ok(Json(response))
}

fn is_busy_rejection(response: &TaskResponse) -> bool {
    response.status == TaskStatus::Failed
        && response.steps.is_empty()
        && response.error.as_deref() == Some(AgentError::Busy.to_string().as_str())
}

async fn status_handler(State(state): State<ServeState>) -> Json<OrchestratorStatus> {
    Json(state.orchestrator.status())
}

async fn stop_handler(State(state): State<ServeState>) -> Json<StopAck> {
    Json(state.orchestrator.stop())
}

async fn tools_handler(State(state): State<ServeState>) -> Json<Value> {
    Json(json!({ "tools": state.orchestrator.dispatcher().available_tools() }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_rejection_is_detected() {
        let mut busy = TaskResponse::new("second");
        busy.fail(AgentError::Busy.to_string());
        assert!(is_busy_rejection(&busy));

        let mut other = TaskResponse::new("goal");
        other.fail("browser session not initialized");
        assert!(!is_busy_rejection(&other));

        let mut done = TaskResponse::new("goal");
        done.complete("Completed 0 steps");
        assert!(!is_busy_rejection(&done));
    }
}
