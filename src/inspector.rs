//! End-to-end inspection: URL in, scored preview record out.
//!
//! The pipeline is strictly staged (parse, retrieve, extract, probe,
//! score) with no retries above the retriever's own escalation. An
//! inspection either completes with a full [`InspectionResult`] or fails
//! with a single [`InspectError`]; there are no partial results.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};
use url::Url;

use crate::config::Config;
use crate::extractor::{self, Metadata};
use crate::fetcher::renderer::{ChromiumRenderer, PageRenderer};
use crate::fetcher::types::BaseUrl;
use crate::fetcher::{FetchError, Retriever};
use crate::scorer::{self, Issue};
use crate::verifier::Verifier;

#[derive(Error, Debug)]
pub enum InspectError {
    /// The input could not be decomposed into an http(s) scheme and a host.
    /// Detected before any network activity.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Retrieval failed after both strategies were exhausted (or the
    /// primary failure was one rendering cannot fix). Callers get one
    /// opaque condition; the diagnostic detail stays on the source chain.
    #[error("failed to scrape url")]
    Retrieval(#[source] FetchError),

    #[error("inspection cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectionResult {
    pub metadata: Metadata,
    pub score: u8,
    pub issues: Vec<Issue>,
}

pub struct Inspector {
    retriever: Retriever,
    verifier: Verifier,
}

impl Inspector {
    /// Inspector with the production Chromium-backed fallback.
    pub fn new(config: &Config) -> Self {
        let renderer = Arc::new(ChromiumRenderer::new(
            config.render_timeout(),
            config.settle_delay(),
        ));
        Self::with_renderer(config, renderer)
    }

    /// Inspector with a caller-supplied rendering capability. Tests inject
    /// scripted fakes here.
    pub fn with_renderer(config: &Config, renderer: Arc<dyn PageRenderer>) -> Self {
        Self {
            retriever: Retriever::new(config, renderer),
            verifier: Verifier::new(config),
        }
    }

    /// Inspect a single URL end to end.
    pub async fn inspect(&self, url: &str) -> Result<InspectionResult, InspectError> {
        self.inspect_with_cancel(url, CancellationToken::new())
            .await
    }

    #[instrument(skip_all, fields(url = %url))]
    pub async fn inspect_with_cancel(
        &self,
        url: &str,
        cancel: CancellationToken,
    ) -> Result<InspectionResult, InspectError> {
        let (parsed, base) = parse_input(url)?;

        let doc = match self.retriever.retrieve(&parsed, &base, &cancel).await {
            Ok(doc) => doc,
            Err(FetchError::Cancelled) => return Err(InspectError::Cancelled),
            Err(e) => {
                warn!("retrieval failed: {e}");
                return Err(InspectError::Retrieval(e));
            }
        };

        let metadata = extractor::extract(&doc, &parsed);

        let page_url = parsed.as_str();
        let (og_reachable, twitter_reachable) = tokio::join!(
            self.verifier
                .verify(metadata.og_image.as_deref(), page_url, &cancel),
            self.verifier
                .verify(metadata.twitter_image.as_deref(), page_url, &cancel),
        );

        let scorecard = scorer::score(&metadata, og_reachable, twitter_reachable);
        info!(
            score = scorecard.score,
            issues = scorecard.issues.len(),
            used_fallback = metadata.used_fallback,
            "inspection complete"
        );

        Ok(InspectionResult {
            metadata,
            score: scorecard.score,
            issues: scorecard.issues,
        })
    }
}

fn parse_input(url: &str) -> Result<(Url, BaseUrl), InspectError> {
    let parsed = Url::parse(url.trim()).map_err(|e| InspectError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(InspectError::InvalidUrl(format!(
                "unsupported scheme '{other}'"
            )));
        }
    }

    let base = BaseUrl::from_url(&parsed)
        .ok_or_else(|| InspectError::InvalidUrl("url has no host".to_string()))?;

    Ok((parsed, base))
}
