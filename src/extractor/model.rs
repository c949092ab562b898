use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Normalized social-preview record for one inspected page.
///
/// Text fields hold trimmed tag content; a tag that is absent, empty, or
/// whitespace-only becomes `None` rather than an empty string. Asset fields
/// (`og_image`, `twitter_image`, `favicon`) hold absolute URLs produced by
/// [`resolve`](crate::resolver::resolve), never a relative path; a value
/// that cannot be made fetchable is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// The inspected URL, as parsed.
    pub url: String,
    pub hostname: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image: Option<String>,
    pub og_site_name: Option<String>,
    pub twitter_card: Option<String>,
    pub twitter_title: Option<String>,
    pub twitter_description: Option<String>,
    pub twitter_image: Option<String>,
    pub favicon: Option<String>,
    /// True when the HTML came from the headless rendering fallback.
    pub used_fallback: bool,
    pub fetched_at: DateTime<Utc>,
}
