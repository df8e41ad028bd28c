//! Plan-act-observe loop.
//!
//! ```text
//! for step in 1..=max_iterations:
//!     if cancelled: stop
//!     observation = observe()           // read_dom, formatted
//!     plan = planner.plan_next_action() // goal, observation, recent rationales
//!     outcome = dispatcher.dispatch()   // tool failures stay in the step
//!     if planner says goal achieved: complete
//!     if step failed and step >= 3: fail
//! ```

pub mod config;
pub mod controller;

pub use config::AgentLoopConfig;
pub use controller::AgentOrchestrator;
