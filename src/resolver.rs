//! Normalizes asset references scraped out of markup into absolute,
//! fetchable URLs.
//!
//! Pages reference their preview images every way imaginable: absolute
//! URLs, protocol-relative `//cdn...` paths, root-relative paths, bare
//! relative paths, inline `data:` payloads, or empty strings. Everything
//! downstream (reachability probes, the emitted record) wants exactly one
//! shape: an absolute URL or nothing.
//!
//! Resolution is pure string work against the [`BaseUrl`] captured at fetch
//! time. Rules apply in order, first match wins.

use crate::fetcher::types::BaseUrl;

/// Resolve a raw tag value to an absolute URL, or `None` when the value is
/// missing, empty, or not fetchable.
pub fn resolve(candidate: Option<&str>, base: &BaseUrl) -> Option<String> {
    let candidate = candidate?.trim();

    if candidate.is_empty() {
        return None;
    }
    if candidate.starts_with("http://") || candidate.starts_with("https://") {
        return Some(candidate.to_string());
    }
    if candidate.starts_with("//") {
        // Always https, regardless of the page's own scheme.
        return Some(format!("https:{candidate}"));
    }
    if candidate.starts_with("data:") {
        // Inline payloads cannot be fetched by preview crawlers; treat them
        // like a missing asset.
        return None;
    }
    if candidate.starts_with('/') {
        return Some(format!("{}{}", base.root(), candidate));
    }
    Some(format!("{}/{}", base.root(), candidate))
}
