//! WebPilot: an LLM-driven browser agent.
//!
//! The agent loop lives in `agent-core`; this crate wires it to configuration,
//! real planner backends, a Chromium session and an HTTP/CLI surface.

pub mod app;
pub mod config;
pub mod llm;
pub mod runtime;
pub mod server;

pub use config::Config;
