//! Two-strategy document retrieval.
//!
//! The primary strategy is a plain GET with a desktop-browser identity; it
//! resolves the overwhelming majority of pages in well under the timeout.
//! When the primary fails in a way that smells like bot-blocking (see
//! [`escalation`](crate::fetcher::escalation)), the retriever escalates to
//! the headless rendering fallback. If the fallback also fails, the caller
//! gets the original primary error; the fallback's own failure is logged
//! and discarded.

use std::sync::Arc;

use chrono::Utc;
use reqwest::{Client, ClientBuilder};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::Config;
use crate::fetcher::errors::FetchError;
use crate::fetcher::escalation::{self, Disposition};
use crate::fetcher::pipeline::decode_html;
use crate::fetcher::renderer::PageRenderer;
use crate::fetcher::types::{BaseUrl, RetrievedDocument};

const MAX_BODY_SIZE: u64 = 5 * 1024 * 1024; // 5MB

pub struct Retriever {
    client: Client,
    renderer: Arc<dyn PageRenderer>,
}

impl Retriever {
    pub fn new(config: &Config, renderer: Arc<dyn PageRenderer>) -> Self {
        Self {
            client: build_client(config),
            renderer,
        }
    }

    /// Fetch `url` and decode it to UTF-8 HTML. `base` must be derived from
    /// `url`; it is carried through so later asset resolution uses the
    /// pre-redirect origin.
    #[instrument(skip_all, fields(url = %url))]
    pub async fn retrieve(
        &self,
        url: &Url,
        base: &BaseUrl,
        cancel: &CancellationToken,
    ) -> Result<RetrievedDocument, FetchError> {
        match self.primary(url, cancel).await {
            Ok(html) => Ok(RetrievedDocument {
                html,
                used_fallback: false,
                base: base.clone(),
                fetched_at: Utc::now(),
            }),
            Err(primary_err) => match escalation::classify(&primary_err) {
                Disposition::Surface => Err(primary_err),
                Disposition::Escalate => self.render_fallback(url, base, primary_err, cancel).await,
            },
        }
    }

    async fn primary(&self, url: &Url, cancel: &CancellationToken) -> Result<String, FetchError> {
        let response = tokio::select! {
            _ = cancel.cancelled() => return Err(FetchError::Cancelled),
            sent = self.client.get(url.clone()).send() => {
                sent.map_err(FetchError::from_reqwest_error)?
            }
        };

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http { status });
        }

        if let Some(content_length) = response.content_length()
            && content_length > MAX_BODY_SIZE
        {
            return Err(FetchError::BodyTooLarge(content_length));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .unwrap_or("text/html")
            .to_string();
        if !content_type.contains("text/html") && !content_type.contains("application/xhtml") {
            return Err(FetchError::UnsupportedContentType(content_type));
        }

        let body_bytes = tokio::select! {
            _ = cancel.cancelled() => return Err(FetchError::Cancelled),
            body = response.bytes() => body.map_err(|e| FetchError::Io(e.to_string()))?,
        };

        // Content-Length may have been absent or lying.
        if body_bytes.len() as u64 > MAX_BODY_SIZE {
            return Err(FetchError::BodyTooLarge(body_bytes.len() as u64));
        }

        decode_html(body_bytes, &content_type)
    }

    async fn render_fallback(
        &self,
        url: &Url,
        base: &BaseUrl,
        primary_err: FetchError,
        cancel: &CancellationToken,
    ) -> Result<RetrievedDocument, FetchError> {
        debug!("primary fetch failed ({primary_err}); escalating to headless rendering");

        let mut session = match self.renderer.acquire().await {
            Ok(session) => session,
            Err(e) => {
                warn!("rendering fallback unavailable: {e}");
                return Err(primary_err);
            }
        };

        // No early return between acquire and dispose: the rendering
        // context is released on every path.
        let rendered = session.render(url, cancel).await;
        session.dispose().await;

        match rendered {
            Ok(html) => Ok(RetrievedDocument {
                html,
                used_fallback: true,
                base: base.clone(),
                fetched_at: Utc::now(),
            }),
            Err(render_err) => {
                // The primary error already names the condition that forced
                // escalation; it is the one worth reporting.
                warn!("rendering fallback failed: {render_err}");
                Err(primary_err)
            }
        }
    }
}

fn build_client(config: &Config) -> Client {
    ClientBuilder::new()
        .timeout(config.primary_timeout())
        .user_agent(config.user_agent())
        .redirect(reqwest::redirect::Policy::limited(10))
        .default_headers({
            let mut headers = reqwest::header::HeaderMap::new();
            headers.insert(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8"
                    .parse()
                    .unwrap(),
            );
            headers.insert(
                reqwest::header::ACCEPT_LANGUAGE,
                "en-US,en;q=0.9".parse().unwrap(),
            );
            headers
        })
        .build()
        .expect("Failed to build HTTP client")
}
