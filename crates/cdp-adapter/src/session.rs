use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::SessionError;

/// Shared handle to a live session.
pub type SharedSession = Arc<dyn BrowserSession>;

/// The capabilities the agent consumes from a controlled browsing context.
///
/// Implementations own the underlying browser; callers only borrow them
/// through a [`SharedSession`]. Closing is reserved for the owner.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Load `url` and wait until the page settles.
    async fn navigate(&self, url: &str) -> Result<(), SessionError>;

    /// Wait up to `timeout` for `selector` to become actionable, then click it.
    async fn click(&self, selector: &str, timeout: Duration) -> Result<(), SessionError>;

    /// Wait up to `timeout` for `selector`, then replace its content with `text`.
    async fn fill(&self, selector: &str, text: &str, timeout: Duration)
        -> Result<(), SessionError>;

    /// Serialized markup of the current document.
    async fn content(&self) -> Result<String, SessionError>;

    /// Evaluate a script expression in the page and return its JSON value.
    async fn evaluate(&self, script: &str) -> Result<Value, SessionError>;

    /// Release the browser. Further calls return [`SessionError::Closed`].
    async fn close(&self) -> Result<(), SessionError>;
}
