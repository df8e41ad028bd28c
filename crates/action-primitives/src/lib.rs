//! Action primitives and the tool dispatcher.
//!
//! This crate turns planner decisions into browser operations:
//! - a name-keyed [`ToolDispatcher`] with a uniform `execute(parameters)` contract
//! - five built-in tools: navigate, click, type, read_dom, wait
//! - a shared [`SessionSlot`] so the session can be swapped after registration
//! - [`extract_page_digest`] for bounded page summaries

pub mod dispatcher;
pub mod dom;
pub mod errors;
pub mod fixture;
mod primitives;
pub mod session_slot;
pub mod types;

pub use dispatcher::{Tool, ToolDispatcher};
pub use dom::{extract_page_digest, PREVIEW_LIMIT, PER_CATEGORY_LIMIT};
pub use errors::ToolError;
pub use fixture::FixtureSession;
pub use primitives::*;
pub use session_slot::SessionSlot;
pub use types::{InteractiveElement, PageDigest, ToolOutcome, ToolParams, ToolSettings};
