//! Browser session layer for WebPilot.
//!
//! Defines the [`BrowserSession`] contract consumed by the tool layer and a
//! Chromium implementation driven over the DevTools protocol.

pub mod chromium;
pub mod config;
pub mod error;
pub mod session;

pub use chromium::ChromiumSession;
pub use config::CdpConfig;
pub use error::SessionError;
pub use session::{BrowserSession, SharedSession};
