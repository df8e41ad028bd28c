//! Configuration for the orchestrator loop.

use serde::{Deserialize, Serialize};

/// Tunables for the plan-act-observe loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentLoopConfig {
    /// Number of prior step rationales shown to the planner.
    /// Default: 5
    pub history_window: usize,

    /// A failed step at or past this iteration index aborts the task.
    /// Default: 3
    pub failure_abort_step: u32,

    /// Pause between iterations in milliseconds.
    /// Default: 1000
    pub step_delay_ms: u64,

    /// Whether a request's `timeout` ends the task.
    /// Default: true
    pub enforce_timeout: bool,

    /// Interactive elements listed in each observation.
    /// Default: 5
    pub observation_elements: usize,
}

impl Default for AgentLoopConfig {
    fn default() -> Self {
        Self {
            history_window: 5,
            failure_abort_step: 3,
            step_delay_ms: 1_000,
            enforce_timeout: true,
            observation_elements: 5,
        }
    }
}

impl AgentLoopConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config with no inter-step pause, for tests.
    pub fn minimal() -> Self {
        Self {
            step_delay_ms: 0,
            ..Self::default()
        }
    }

    /// Builder: set the inter-step pause.
    pub fn step_delay(mut self, ms: u64) -> Self {
        self.step_delay_ms = ms;
        self
    }

    /// Builder: set the rationale window.
    pub fn history(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }

    /// Builder: set the failure abort index.
    pub fn abort_after(mut self, step: u32) -> Self {
        self.failure_abort_step = step;
        self
    }

    /// Builder: toggle timeout enforcement.
    pub fn timeout_enforced(mut self, enabled: bool) -> Self {
        self.enforce_timeout = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AgentLoopConfig::default();
        assert_eq!(config.history_window, 5);
        assert_eq!(config.failure_abort_step, 3);
        assert_eq!(config.step_delay_ms, 1_000);
        assert!(config.enforce_timeout);
    }

    #[test]
    fn test_builder() {
        let config = AgentLoopConfig::new()
            .step_delay(10)
            .history(2)
            .abort_after(4)
            .timeout_enforced(false);

        assert_eq!(config.step_delay_ms, 10);
        assert_eq!(config.history_window, 2);
        assert_eq!(config.failure_abort_step, 4);
        assert!(!config.enforce_timeout);
    }

    #[test]
    fn test_partial_deserialize() {
        let config: AgentLoopConfig = serde_json::from_str(r#"{"step_delay_ms": 250}"#).unwrap();
        assert_eq!(config.step_delay_ms, 250);
        assert_eq!(config.history_window, 5);
    }
}
