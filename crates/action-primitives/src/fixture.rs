//! In-memory browser session backed by static pages.
//!
//! Deterministic provider used for tests and offline development: pages are
//! registered up front, selectors are resolved against the stored markup and
//! every interaction is recorded for later inspection.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use cdp_adapter::{BrowserSession, SessionError};
use parking_lot::Mutex;
use scraper::{Html, Selector};
use serde_json::Value;

const BLANK_URL: &str = "about:blank";
const BLANK_DOCUMENT: &str = "<html><head></head><body></body></html>";

#[derive(Debug, Default)]
struct FixtureState {
    pages: HashMap<String, String>,
    current: Option<String>,
    navigations: Vec<String>,
    clicks: Vec<String>,
    fills: Vec<(String, String)>,
    closed: bool,
}

impl FixtureState {
    fn ensure_open(&self) -> Result<(), SessionError> {
        if self.closed {
            Err(SessionError::Closed)
        } else {
            Ok(())
        }
    }

    fn current_html(&self) -> &str {
        self.current
            .as_ref()
            .and_then(|url| self.pages.get(url))
            .map(String::as_str)
            .unwrap_or(BLANK_DOCUMENT)
    }

    fn go_to(&mut self, url: &str) -> Result<(), SessionError> {
        if !self.pages.contains_key(url) {
            return Err(SessionError::Navigation(format!("no fixture page for {url}")));
        }
        self.current = Some(url.to_string());
        self.navigations.push(url.to_string());
        Ok(())
    }

    /// Resolve `selector` in the current page, returning the first match's `href`.
    fn resolve(&self, selector: &str) -> Result<Option<String>, SessionError> {
        let parsed = Selector::parse(selector)
            .map_err(|err| SessionError::script(format!("invalid selector `{selector}`: {err:?}")))?;
        let document = Html::parse_document(self.current_html());
        let element = document
            .select(&parsed)
            .next()
            .ok_or_else(|| SessionError::timeout(format!("waiting for selector `{selector}` failed")))?;
        Ok(element.value().attr("href").map(str::to_string))
    }

    fn title(&self) -> String {
        let document = Html::parse_document(self.current_html());
        Selector::parse("title")
            .ok()
            .and_then(|selector| {
                document
                    .select(&selector)
                    .next()
                    .map(|title| title.text().collect::<String>().trim().to_string())
            })
            .unwrap_or_default()
    }
}

/// Static-page [`BrowserSession`].
#[derive(Debug, Default)]
pub struct FixtureSession {
    state: Mutex<FixtureState>,
}

impl FixtureSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a page served for `url`.
    pub fn with_page(self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.state.lock().pages.insert(url.into(), html.into());
        self
    }

    /// Start on `url` without recording a navigation.
    pub fn starting_at(self, url: impl Into<String>) -> Self {
        self.state.lock().current = Some(url.into());
        self
    }

    pub fn current_url(&self) -> Option<String> {
        self.state.lock().current.clone()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.state.lock().navigations.clone()
    }

    pub fn clicks(&self) -> Vec<String> {
        self.state.lock().clicks.clone()
    }

    pub fn fills(&self) -> Vec<(String, String)> {
        self.state.lock().fills.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }
}

#[async_trait]
impl BrowserSession for FixtureSession {
    async fn navigate(&self, url: &str) -> Result<(), SessionError> {
        let mut state = self.state.lock();
        state.ensure_open()?;
        state.go_to(url)
    }

    async fn click(&self, selector: &str, _timeout: Duration) -> Result<(), SessionError> {
        let mut state = self.state.lock();
        state.ensure_open()?;
        let href = state.resolve(selector)?;
        state.clicks.push(selector.to_string());
        let follow = href.filter(|target| state.pages.contains_key(target));
        if let Some(target) = follow {
            state.go_to(&target)?;
        }
        Ok(())
    }

    async fn fill(&self, selector: &str, text: &str, _timeout: Duration) -> Result<(), SessionError> {
        let mut state = self.state.lock();
        state.ensure_open()?;
        state.resolve(selector)?;
        state.fills.push((selector.to_string(), text.to_string()));
        Ok(())
    }

    async fn content(&self) -> Result<String, SessionError> {
        let state = self.state.lock();
        state.ensure_open()?;
        Ok(state.current_html().to_string())
    }

    async fn evaluate(&self, script: &str) -> Result<Value, SessionError> {
        let state = self.state.lock();
        state.ensure_open()?;
        match script.trim() {
            "window.location.href" => Ok(Value::String(
                state.current.clone().unwrap_or_else(|| BLANK_URL.to_string()),
            )),
            "document.title" => Ok(Value::String(state.title())),
            other => Err(SessionError::script(format!("unsupported fixture script: {other}"))),
        }
    }

    async fn close(&self) -> Result<(), SessionError> {
        self.state.lock().closed = true;
        Ok(())
    }
}
