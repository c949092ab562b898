//! Headless-browser fallback for pages that block plain HTTP clients or
//! only materialize their markup client-side.
//!
//! Rendering is expensive, so it sits behind a capability trait: the
//! retriever acquires a session, renders once, and must release the session
//! on every path. The production implementation launches a fresh disposable
//! Chromium per session; nothing is pooled or reused across inspections.

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};
use url::Url;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("navigation timed out after {0:?}")]
    Timeout(Duration),

    #[error("failed to capture rendered document: {0}")]
    Capture(String),

    #[error("render cancelled")]
    Cancelled,
}

/// One disposable rendering context.
///
/// `dispose` must be called on every path once acquired; the underlying
/// browser process is not reclaimed by merely dropping the handle.
#[async_trait]
pub trait RenderSession: Send {
    /// Navigate, wait for DOM readiness plus a settle delay, return the
    /// serialized document.
    async fn render(&mut self, url: &Url, cancel: &CancellationToken) -> Result<String, RenderError>;

    /// Tear the context down. Cannot fail; callers release on every path
    /// without error handling.
    async fn dispose(self: Box<Self>);
}

/// Source of rendering sessions. The retriever holds one of these; tests
/// substitute scripted fakes so escalation and disposal logic run without
/// a browser binary.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn acquire(&self) -> Result<Box<dyn RenderSession>, RenderError>;
}

/// Chromium-backed renderer. Each `acquire` launches a fresh headless
/// process with its own event handler task.
pub struct ChromiumRenderer {
    nav_timeout: Duration,
    settle_delay: Duration,
}

impl ChromiumRenderer {
    pub fn new(nav_timeout: Duration, settle_delay: Duration) -> Self {
        Self {
            nav_timeout,
            settle_delay,
        }
    }
}

#[async_trait]
impl PageRenderer for ChromiumRenderer {
    async fn acquire(&self) -> Result<Box<dyn RenderSession>, RenderError> {
        let config = BrowserConfig::builder()
            .no_sandbox()
            .args(vec![
                "--disable-gpu",
                "--disable-dev-shm-usage",
                "--disable-extensions",
                "--mute-audio",
            ])
            .build()
            .map_err(RenderError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| RenderError::Launch(e.to_string()))?;

        // The handler stream must be driven for the whole browser lifetime
        // or every CDP call stalls.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        Ok(Box::new(ChromiumSession {
            browser,
            handler_task,
            nav_timeout: self.nav_timeout,
            settle_delay: self.settle_delay,
        }))
    }
}

struct ChromiumSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    nav_timeout: Duration,
    settle_delay: Duration,
}

#[async_trait]
impl RenderSession for ChromiumSession {
    #[instrument(skip_all, fields(url = %url))]
    async fn render(&mut self, url: &Url, cancel: &CancellationToken) -> Result<String, RenderError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| RenderError::Navigation(e.to_string()))?;

        let navigate = async {
            page.goto(url.as_str())
                .await
                .map_err(|e| RenderError::Navigation(e.to_string()))?;
            page.wait_for_navigation()
                .await
                .map_err(|e| RenderError::Navigation(e.to_string()))?;
            Ok::<(), RenderError>(())
        };
        tokio::select! {
            _ = cancel.cancelled() => return Err(RenderError::Cancelled),
            outcome = tokio::time::timeout(self.nav_timeout, navigate) => match outcome {
                Ok(navigated) => navigated?,
                Err(_) => return Err(RenderError::Timeout(self.nav_timeout)),
            },
        }

        // Load fired, but client-side frameworks are often still hydrating;
        // give the DOM a moment to settle before snapshotting.
        tokio::select! {
            _ = cancel.cancelled() => return Err(RenderError::Cancelled),
            _ = tokio::time::sleep(self.settle_delay) => {}
        }

        let html = page
            .content()
            .await
            .map_err(|e| RenderError::Capture(e.to_string()))?;

        if let Err(e) = page.close().await {
            debug!("failed to close rendered page: {e}");
        }

        Ok(html)
    }

    async fn dispose(mut self: Box<Self>) {
        if let Err(e) = self.browser.close().await {
            warn!("failed to close headless browser: {e}");
        }
        if let Err(e) = self.browser.wait().await {
            debug!("headless browser did not exit cleanly: {e}");
        }
        self.handler_task.abort();
    }
}
