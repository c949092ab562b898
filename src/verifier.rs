//! Reachability probes for preview assets.
//!
//! Two tiers, cheapest first. Tier 1 is a HEAD request; a 200 answers the
//! question and a 403 is assumed to be hotlink protection rather than a
//! broken asset. Anything else (including transport failure) falls through
//! to tier 2, a GET for the first byte via `Range: bytes=0-0`; some CDNs
//! reject HEAD outright but serve ranged GETs fine.
//!
//! Probing never fails the inspection: any error collapses to "not
//! reachable".

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, RANGE, REFERER};
use reqwest::{Client, ClientBuilder, StatusCode};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use crate::config::Config;

pub struct Verifier {
    client: Client,
}

impl Verifier {
    pub fn new(config: &Config) -> Self {
        let client = ClientBuilder::new()
            .timeout(config.probe_timeout())
            .user_agent(config.user_agent())
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .expect("Failed to build probe client");
        Self { client }
    }

    /// True when the asset at `url` answers like a servable image.
    /// `page_url` is sent as the referer so hotlink-protected hosts see a
    /// plausible origin.
    #[instrument(skip_all, fields(asset = url.unwrap_or("-")))]
    pub async fn verify(
        &self,
        url: Option<&str>,
        page_url: &str,
        cancel: &CancellationToken,
    ) -> bool {
        let Some(url) = url else {
            return false;
        };

        if self.head_probe(url, page_url, cancel).await {
            return true;
        }
        self.range_probe(url, page_url, cancel).await
    }

    /// Tier 1. `false` means "unproven", not "broken"; the caller falls
    /// through to tier 2.
    async fn head_probe(&self, url: &str, page_url: &str, cancel: &CancellationToken) -> bool {
        let request = self.client.head(url).headers(probe_headers(page_url));
        let response = tokio::select! {
            _ = cancel.cancelled() => return false,
            sent = request.send() => sent,
        };

        match response {
            Ok(response) => {
                let status = response.status();
                status == StatusCode::OK || status == StatusCode::FORBIDDEN
            }
            Err(e) => {
                debug!("head probe failed: {e}");
                false
            }
        }
    }

    /// Tier 2: fetch a single byte.
    async fn range_probe(&self, url: &str, page_url: &str, cancel: &CancellationToken) -> bool {
        let request = self
            .client
            .get(url)
            .headers(probe_headers(page_url))
            .header(RANGE, "bytes=0-0");
        let response = tokio::select! {
            _ = cancel.cancelled() => return false,
            sent = request.send() => sent,
        };

        match response {
            Ok(response) => {
                let status = response.status();
                status.as_u16() < 400 || status == StatusCode::FORBIDDEN
            }
            Err(e) => {
                debug!("range probe failed: {e}");
                false
            }
        }
    }
}

fn probe_headers(page_url: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("image/avif,image/webp,image/apng,image/svg+xml,image/*,*/*;q=0.8"),
    );
    headers.insert("sec-fetch-dest", HeaderValue::from_static("image"));
    headers.insert("sec-fetch-mode", HeaderValue::from_static("no-cors"));
    headers.insert("sec-fetch-site", HeaderValue::from_static("cross-site"));
    // Page URLs are not always valid header values (control chars after
    // percent-decoding, say); skip the referer rather than fail the probe.
    if let Ok(referer) = HeaderValue::from_str(page_url) {
        headers.insert(REFERER, referer);
    }
    headers
}
