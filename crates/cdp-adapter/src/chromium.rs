//! Chromium-backed [`BrowserSession`] built on `chromiumoxide`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use futures::StreamExt;
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::CdpConfig;
use crate::error::SessionError;
use crate::session::BrowserSession;

/// A single-page Chromium session.
///
/// The session owns the browser process and its event handler task. It is
/// opened with [`ChromiumSession::launch`] and torn down with
/// [`BrowserSession::close`].
pub struct ChromiumSession {
    browser: Mutex<Option<Browser>>,
    handler: Mutex<Option<JoinHandle<()>>>,
    page: Page,
    closed: AtomicBool,
    settle_timeout: Duration,
    poll_interval: Duration,
}

impl ChromiumSession {
    /// Start a browser and open a blank page.
    pub async fn launch(config: &CdpConfig) -> Result<Self, SessionError> {
        let mut builder = BrowserConfig::builder()
            .window_size(config.window_width, config.window_height)
            .no_sandbox();
        if !config.headless {
            builder = builder.with_head();
        }
        if let Some(executable) = config.resolve_executable() {
            builder = builder.chrome_executable(executable);
        }
        if let Some(user_agent) = &config.user_agent {
            builder = builder.arg(format!("--user-agent={user_agent}"));
        }
        for arg in &config.args {
            builder = builder.arg(arg.clone());
        }
        let browser_config = builder.build().map_err(SessionError::Launch)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|err| SessionError::Launch(err.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(err) = event {
                    debug!(target: "cdp", ?err, "devtools handler reported an error");
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|err| SessionError::Launch(format!("failed to open page: {err}")))?;

        info!(
            target: "cdp",
            headless = config.headless,
            width = config.window_width,
            height = config.window_height,
            "Chromium session launched"
        );

        Ok(Self {
            browser: Mutex::new(Some(browser)),
            handler: Mutex::new(Some(handler_task)),
            page,
            closed: AtomicBool::new(false),
            settle_timeout: Duration::from_millis(config.settle_timeout_ms),
            poll_interval: Duration::from_millis(config.poll_interval_ms.max(10)),
        })
    }

    fn page(&self) -> Result<&Page, SessionError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(SessionError::Closed);
        }
        Ok(&self.page)
    }

    async fn wait_for_selector(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<Element, SessionError> {
        let page = self.page()?;
        let deadline = Instant::now() + timeout;
        loop {
            match page.find_element(selector).await {
                Ok(element) => return Ok(element),
                Err(err) if Instant::now() >= deadline => {
                    return Err(SessionError::timeout(format!(
                        "waiting for selector `{selector}` exceeded {}ms: {err}",
                        timeout.as_millis()
                    )));
                }
                Err(_) => tokio::time::sleep(self.poll_interval).await,
            }
        }
    }

    async fn wait_until_settled(&self) -> Result<(), SessionError> {
        let deadline = Instant::now() + self.settle_timeout;
        loop {
            let state = self.evaluate("document.readyState").await?;
            if state.as_str() == Some("complete") {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(SessionError::timeout(format!(
                    "page did not settle within {}ms (readyState={state})",
                    self.settle_timeout.as_millis()
                )));
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn navigate(&self, url: &str) -> Result<(), SessionError> {
        let page = self.page()?;
        debug!(target: "cdp", %url, "navigating");
        page.goto(url)
            .await
            .map_err(|err| SessionError::Navigation(format!("{url}: {err}")))?;
        self.wait_until_settled().await
    }

    async fn click(&self, selector: &str, timeout: Duration) -> Result<(), SessionError> {
        let element = self.wait_for_selector(selector, timeout).await?;
        element.click().await?;
        Ok(())
    }

    async fn fill(
        &self,
        selector: &str,
        text: &str,
        timeout: Duration,
    ) -> Result<(), SessionError> {
        let element = self.wait_for_selector(selector, timeout).await?;
        let quoted =
            serde_json::to_string(selector).map_err(|err| SessionError::script(err.to_string()))?;
        let clear = format!(
            "(() => {{ const el = document.querySelector({quoted}); \
             if (el && 'value' in el) {{ el.value = ''; \
             el.dispatchEvent(new Event('input', {{ bubbles: true }})); }} return true; }})()"
        );
        self.evaluate(&clear).await?;
        element.click().await?;
        element.type_str(text).await?;
        Ok(())
    }

    async fn content(&self) -> Result<String, SessionError> {
        Ok(self.page()?.content().await?)
    }

    async fn evaluate(&self, script: &str) -> Result<Value, SessionError> {
        let result = self
            .page()?
            .evaluate(script)
            .await
            .map_err(|err| SessionError::script(err.to_string()))?;
        Ok(result.value().cloned().unwrap_or(Value::Null))
    }

    async fn close(&self) -> Result<(), SessionError> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let mut outcome = Ok(());
        if let Some(mut browser) = self.browser.lock().await.take() {
            if let Err(err) = browser.close().await {
                warn!(target: "cdp", ?err, "browser close command failed");
                outcome = Err(SessionError::from(err));
            }
            if let Err(err) = browser.wait().await {
                warn!(target: "cdp", ?err, "waiting for browser exit failed");
            }
        }
        if let Some(task) = self.handler.lock().await.take() {
            task.abort();
        }
        info!(target: "cdp", "Chromium session closed");
        outcome
    }
}
