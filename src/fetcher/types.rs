use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// Scheme and authority that relative asset references on a page resolve
/// against. Derived once from the input URL, before any redirects, so every
/// resolution within a single inspection uses the same base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseUrl {
    pub scheme: String,
    /// Host, keeping an explicit `:port` when the URL carries a
    /// non-default one.
    pub host: String,
}

impl BaseUrl {
    /// `None` when the URL has no host (e.g. `data:` or `mailto:` URLs).
    pub fn from_url(url: &Url) -> Option<Self> {
        let host = url.host_str()?;
        let host = match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };
        Some(Self {
            scheme: url.scheme().to_string(),
            host,
        })
    }

    /// Origin string, `scheme://host`, without a trailing slash.
    pub fn root(&self) -> String {
        format!("{}://{}", self.scheme, self.host)
    }
}

/// Raw HTML obtained for one inspection, along with how it was obtained.
#[derive(Debug, Clone)]
pub struct RetrievedDocument {
    /// Decoded UTF-8 markup.
    pub html: String,
    /// True when the headless rendering fallback produced the HTML instead
    /// of the plain HTTP client.
    pub used_fallback: bool,
    pub base: BaseUrl,
    pub fetched_at: DateTime<Utc>,
}
