use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use agent_core::{AgentOrchestrator, TaskResponse, TaskStatus};
use parking_lot::Mutex;

#[derive(Clone)]
pub struct ServeState {
    pub orchestrator: Arc<AgentOrchestrator>,
    pub health: Arc<ServeHealth>,
}

impl ServeState {
    pub fn new(orchestrator: Arc<AgentOrchestrator>) -> Self {
        Self {
            orchestrator,
            health: Arc::new(ServeHealth::new()),
        }
    }

    pub fn health_snapshot(&self) -> ServeHealthSnapshot {
        self.health.snapshot()
    }

    pub(crate) fn record_task(&self, response: &TaskResponse) {
        self.health.record_task(response);
    }
}

/// Counters surfaced by `GET /health`.
#[derive(Default)]
pub struct ServeHealth {
    started_at: AtomicU64,
    live: AtomicBool,
    tasks_total: AtomicU64,
    tasks_failed: AtomicU64,
    last_error: Mutex<Option<String>>,
}

impl ServeHealth {
    pub fn new() -> Self {
        let health = Self::default();
        health.started_at.store(unix_now(), Ordering::SeqCst);
        health
    }

    pub fn mark_live(&self) {
        self.live.store(true, Ordering::SeqCst);
    }

    pub fn record_task(&self, response: &TaskResponse) {
        self.tasks_total.fetch_add(1, Ordering::SeqCst);
        if response.status == TaskStatus::Failed {
            self.tasks_failed.fetch_add(1, Ordering::SeqCst);
            *self.last_error.lock() = response.error.clone();
        }
    }

    pub fn snapshot(&self) -> ServeHealthSnapshot {
        ServeHealthSnapshot {
            live: self.live.load(Ordering::SeqCst),
            started_at: self.started_at.load(Ordering::SeqCst),
            tasks_total: self.tasks_total.load(Ordering::SeqCst),
            tasks_failed: self.tasks_failed.load(Ordering::SeqCst),
            last_error: self.last_error.lock().clone(),
        }
    }
}

pub struct ServeHealthSnapshot {
    pub live: bool,
    pub started_at: u64,
    pub tasks_total: u64,
    pub tasks_failed: u64,
    pub last_error: Option<String>,
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_secs())
        .unwrap_or_default()
}
