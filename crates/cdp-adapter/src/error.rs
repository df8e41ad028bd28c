use thiserror::Error;

/// Errors surfaced by a browser session.
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    /// The browser process could not be started or attached.
    #[error("failed to launch browser: {0}")]
    Launch(String),

    /// Navigation did not complete.
    #[error("navigation failed: {0}")]
    Navigation(String),

    /// A bounded wait expired before its condition was met.
    #[error("timeout: {0}")]
    Timeout(String),

    /// Script evaluation raised or returned something unusable.
    #[error("script evaluation failed: {0}")]
    Script(String),

    /// The session was closed underneath the caller.
    #[error("browser session is closed")]
    Closed,

    /// Transport level DevTools failure.
    #[error("cdp i/o failure: {0}")]
    Cdp(String),
}

impl SessionError {
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout(message.into())
    }

    pub fn script(message: impl Into<String>) -> Self {
        Self::Script(message.into())
    }

    /// Whether retrying the same call could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SessionError::Timeout(_) | SessionError::Cdp(_))
    }
}

impl From<chromiumoxide::error::CdpError> for SessionError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        SessionError::Cdp(err.to_string())
    }
}
