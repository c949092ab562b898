//! Shared pieces for the integration suites: a scripted renderer standing in
//! for headless Chromium, and a config tuned for local mock servers.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use ogaudit::Config;
use ogaudit::fetcher::{PageRenderer, RenderError, RenderSession};
use tokio_util::sync::CancellationToken;
use url::Url;

/// Short timeouts, no settle delay; everything talks to 127.0.0.1.
pub fn test_config() -> Config {
    Config::new(2, 5, 0, 2, "ogaudit-tests/0.1")
}

/// Counts how renderer sessions are used so tests can assert acquisition
/// and disposal discipline.
#[derive(Default)]
pub struct RendererProbe {
    pub acquired: AtomicUsize,
    pub rendered: AtomicUsize,
    pub disposed: AtomicUsize,
}

/// Scripted renderer: serves a fixed document, or fails every render when
/// constructed with `failing`.
pub struct FakeRenderer {
    html: Option<String>,
    pub probe: Arc<RendererProbe>,
}

impl FakeRenderer {
    pub fn serving(html: &str) -> Self {
        Self {
            html: Some(html.to_string()),
            probe: Arc::new(RendererProbe::default()),
        }
    }

    pub fn failing() -> Self {
        Self {
            html: None,
            probe: Arc::new(RendererProbe::default()),
        }
    }
}

#[async_trait]
impl PageRenderer for FakeRenderer {
    async fn acquire(&self) -> Result<Box<dyn RenderSession>, RenderError> {
        self.probe.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeSession {
            html: self.html.clone(),
            probe: self.probe.clone(),
        }))
    }
}

struct FakeSession {
    html: Option<String>,
    probe: Arc<RendererProbe>,
}

#[async_trait]
impl RenderSession for FakeSession {
    async fn render(
        &mut self,
        _url: &Url,
        _cancel: &CancellationToken,
    ) -> Result<String, RenderError> {
        self.probe.rendered.fetch_add(1, Ordering::SeqCst);
        match &self.html {
            Some(html) => Ok(html.clone()),
            None => Err(RenderError::Navigation("scripted failure".to_string())),
        }
    }

    async fn dispose(self: Box<Self>) {
        self.probe.disposed.fetch_add(1, Ordering::SeqCst);
    }
}
