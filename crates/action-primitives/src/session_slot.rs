use std::sync::Arc;

use cdp_adapter::SharedSession;
use parking_lot::RwLock;

use crate::errors::ToolError;

/// Shared, swappable reference to the active browser session.
///
/// Every session-dependent tool holds a clone of the same slot, so replacing
/// the session here re-targets all of them at once. Handlers clone the inner
/// `Arc` out before awaiting; the lock is never held across a session call.
#[derive(Clone, Default)]
pub struct SessionSlot {
    inner: Arc<RwLock<Option<SharedSession>>>,
}

impl SessionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: SharedSession) -> Self {
        let slot = Self::new();
        slot.replace(Some(session));
        slot
    }

    /// Current session, or [`ToolError::SessionUnavailable`] when none is attached.
    pub fn get(&self) -> Result<SharedSession, ToolError> {
        self.inner
            .read()
            .as_ref()
            .cloned()
            .ok_or(ToolError::SessionUnavailable)
    }

    /// Install a new session (or detach with `None`), returning the previous one.
    pub fn replace(&self, session: Option<SharedSession>) -> Option<SharedSession> {
        std::mem::replace(&mut *self.inner.write(), session)
    }

    pub fn is_ready(&self) -> bool {
        self.inner.read().is_some()
    }
}

impl std::fmt::Debug for SessionSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSlot")
            .field("ready", &self.is_ready())
            .finish()
    }
}
