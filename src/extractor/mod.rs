//! Pulls social-preview metadata out of retrieved HTML.
//!
//! Every field is a first-non-empty-wins cascade over the places sites
//! actually put the value. Social tags are matched under both the
//! `property=` and `name=` attribute spellings because the ecosystem never
//! settled on one. Extraction is lossless in intent: whatever the page
//! declares gets normalized and recorded; judging it is the scorer's job.

pub mod model;

#[cfg(test)]
mod tests;

pub use model::Metadata;

use scraper::{Html, Selector};
use url::Url;

use crate::fetcher::types::RetrievedDocument;
use crate::resolver::resolve;

/// Extract the preview record from a retrieved document.
///
/// Synchronous: the parsed DOM is not `Send` and must never live across an
/// await point.
pub fn extract(doc: &RetrievedDocument, url: &Url) -> Metadata {
    let html = Html::parse_document(&doc.html);
    let base = &doc.base;

    let title = element_text(&html, "title")
        .or_else(|| attr_first(&html, "meta[name='title']", "content"))
        .or_else(|| meta_social(&html, "og:title"));

    let description = attr_first(&html, "meta[name='description']", "content")
        .or_else(|| meta_social(&html, "og:description"));

    // Shared low-priority image sources.
    let image_src = attr_first(&html, "link[rel='image_src']", "href");
    let itemprop_image = attr_first(&html, "meta[itemprop='image']", "content");

    let og_image_raw = meta_social(&html, "og:image")
        .or_else(|| image_src.clone())
        .or_else(|| itemprop_image.clone());

    // Twitter falls back to the og image but not to the itemprop one;
    // Twitter's own crawler never read microdata.
    let twitter_image_raw = meta_social(&html, "twitter:image")
        .or_else(|| meta_social(&html, "og:image"))
        .or_else(|| image_src.clone());

    let favicon_raw = attr_first(&html, "link[rel='icon']", "href")
        .or_else(|| attr_first(&html, "link[rel='shortcut icon']", "href"))
        .unwrap_or_else(|| "/favicon.ico".to_string());

    Metadata {
        url: url.to_string(),
        hostname: url.host_str().unwrap_or_default().to_string(),
        title,
        description,
        og_title: meta_social(&html, "og:title"),
        og_description: meta_social(&html, "og:description"),
        og_image: resolve(og_image_raw.as_deref(), base),
        og_site_name: meta_social(&html, "og:site_name"),
        twitter_card: meta_social(&html, "twitter:card"),
        twitter_title: meta_social(&html, "twitter:title"),
        twitter_description: meta_social(&html, "twitter:description"),
        twitter_image: resolve(twitter_image_raw.as_deref(), base),
        favicon: resolve(Some(&favicon_raw), base),
        used_fallback: doc.used_fallback,
        fetched_at: doc.fetched_at,
    }
}

/// First non-empty value of `attr` across elements matching `selector`.
fn attr_first(html: &Html, selector: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    html.select(&selector)
        .filter_map(|element| element.value().attr(attr))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

/// A social tag under either attribute spelling, `property=` preferred.
fn meta_social(html: &Html, key: &str) -> Option<String> {
    attr_first(html, &format!("meta[property='{key}']"), "content")
        .or_else(|| attr_first(html, &format!("meta[name='{key}']"), "content"))
}

/// First non-empty text content across elements matching `selector`.
fn element_text(html: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    html.select(&selector)
        .map(|element| element.text().collect::<String>().trim().to_string())
        .find(|text| !text.is_empty())
}
