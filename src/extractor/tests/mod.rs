use std::fs;

use chrono::Utc;
use url::Url;

use crate::extractor::{Metadata, extract};
use crate::fetcher::types::{BaseUrl, RetrievedDocument};

fn extract_from(html: &str, url: &str) -> Metadata {
    let url = Url::parse(url).unwrap();
    let base = BaseUrl::from_url(&url).unwrap();
    let doc = RetrievedDocument {
        html: html.to_string(),
        used_fallback: false,
        base,
        fetched_at: Utc::now(),
    };
    extract(&doc, &url)
}

#[test]
fn extracts_fully_tagged_page() {
    let html = fs::read_to_string("src/extractor/tests/fixtures/rich.html")
        .expect("Failed to read test fixture");

    let meta = extract_from(&html, "https://orbit.dev/product");

    assert_eq!(meta.url, "https://orbit.dev/product");
    assert_eq!(meta.hostname, "orbit.dev");
    assert_eq!(meta.title.as_deref(), Some("Ship Faster with Orbit — Orbit CI"));
    assert_eq!(
        meta.description.as_deref(),
        Some("Orbit runs your test suite in parallel across ephemeral runners.")
    );
    assert_eq!(meta.og_title.as_deref(), Some("Ship Faster with Orbit"));
    assert_eq!(
        meta.og_description.as_deref(),
        Some("Parallel CI that bills by the second.")
    );
    assert_eq!(
        meta.og_image.as_deref(),
        Some("https://cdn.orbit.dev/social/card.png")
    );
    assert_eq!(meta.og_site_name.as_deref(), Some("Orbit CI"));
    assert_eq!(meta.twitter_card.as_deref(), Some("summary_large_image"));
    assert_eq!(
        meta.twitter_image.as_deref(),
        Some("https://cdn.orbit.dev/social/card-twitter.png")
    );
    // Root-relative favicon resolves against the page origin.
    assert_eq!(
        meta.favicon.as_deref(),
        Some("https://orbit.dev/static/favicon.ico")
    );
    assert!(!meta.used_fallback);
}

#[test]
fn sparse_page_yields_mostly_none() {
    let html = fs::read_to_string("src/extractor/tests/fixtures/sparse.html")
        .expect("Failed to read test fixture");

    let meta = extract_from(&html, "https://example.com/notes");

    assert_eq!(meta.title.as_deref(), Some("Weekly notes"));
    assert_eq!(meta.description, None);
    assert_eq!(meta.og_title, None);
    assert_eq!(meta.og_image, None);
    assert_eq!(meta.twitter_image, None);
    // No icon link declared; every site still serves the well-known path.
    assert_eq!(
        meta.favicon.as_deref(),
        Some("https://example.com/favicon.ico")
    );
}

#[test]
fn social_tags_match_under_name_spelling() {
    let html = r#"<html><head>
        <meta name="og:title" content="Name-spelled title">
        <meta name="og:image" content="https://cdn.example.com/og.png">
    </head></html>"#;

    let meta = extract_from(html, "https://example.com/");
    assert_eq!(meta.og_title.as_deref(), Some("Name-spelled title"));
    assert_eq!(
        meta.og_image.as_deref(),
        Some("https://cdn.example.com/og.png")
    );
}

#[test]
fn first_non_empty_occurrence_wins() {
    let html = r#"<html><head>
        <meta property="og:title" content="   ">
        <meta property="og:title" content="Second tag">
        <meta property="og:title" content="Third tag">
    </head></html>"#;

    let meta = extract_from(html, "https://example.com/");
    assert_eq!(meta.og_title.as_deref(), Some("Second tag"));
}

#[test]
fn og_image_falls_back_to_image_src_then_itemprop() {
    let linked = r#"<html><head>
        <link rel="image_src" href="/linked.png">
    </head></html>"#;
    let meta = extract_from(linked, "https://example.com/");
    assert_eq!(
        meta.og_image.as_deref(),
        Some("https://example.com/linked.png")
    );
    // image_src is also a twitter candidate.
    assert_eq!(
        meta.twitter_image.as_deref(),
        Some("https://example.com/linked.png")
    );

    let microdata = r#"<html><head>
        <meta itemprop="image" content="/schema.png">
    </head></html>"#;
    let meta = extract_from(microdata, "https://example.com/");
    assert_eq!(
        meta.og_image.as_deref(),
        Some("https://example.com/schema.png")
    );
    // Microdata never feeds the twitter slot.
    assert_eq!(meta.twitter_image, None);
}

#[test]
fn twitter_image_falls_back_to_og_image() {
    let html = r#"<html><head>
        <meta property="og:image" content="https://cdn.example.com/og.png">
    </head></html>"#;

    let meta = extract_from(html, "https://example.com/");
    assert_eq!(meta.twitter_image, meta.og_image);
}

#[test]
fn relative_image_resolves_against_origin_with_port() {
    let html = r#"<html><head>
        <meta property="og:image" content="/img/og.png">
    </head></html>"#;

    let meta = extract_from(html, "http://127.0.0.1:8080/page");
    assert_eq!(
        meta.og_image.as_deref(),
        Some("http://127.0.0.1:8080/img/og.png")
    );
}

#[test]
fn data_uri_image_is_dropped() {
    let html = r#"<html><head>
        <meta property="og:image" content="data:image/png;base64,iVBORw0KGgo=">
    </head></html>"#;

    let meta = extract_from(html, "https://example.com/");
    assert_eq!(meta.og_image, None);
}

#[test]
fn whitespace_only_description_is_none() {
    let html = r#"<html><head>
        <meta name="description" content="   ">
    </head></html>"#;

    let meta = extract_from(html, "https://example.com/");
    assert_eq!(meta.description, None);
}

#[test]
fn shortcut_icon_spelling_accepted() {
    let html = r#"<html><head>
        <link rel="shortcut icon" href="/old-school.ico">
    </head></html>"#;

    let meta = extract_from(html, "https://example.com/");
    assert_eq!(
        meta.favicon.as_deref(),
        Some("https://example.com/old-school.ico")
    );
}

#[test]
fn title_cascades_to_meta_title_tag() {
    let html = r#"<html><head>
        <title></title>
        <meta name="title" content="Meta-declared title">
    </head></html>"#;

    let meta = extract_from(html, "https://example.com/");
    assert_eq!(meta.title.as_deref(), Some("Meta-declared title"));
}

#[test]
fn malformed_html_is_handled_gracefully() {
    let html = "<html><head><title>Broken<meta property=og:image content=/og.png><body><p>Unclosed";

    let meta = extract_from(html, "https://example.com/");
    // html5ever recovers; whatever parses is what we report.
    assert_eq!(meta.hostname, "example.com");
}

#[test]
fn fallback_flag_is_carried_through() {
    let url = Url::parse("https://example.com/").unwrap();
    let doc = RetrievedDocument {
        html: "<html></html>".to_string(),
        used_fallback: true,
        base: BaseUrl::from_url(&url).unwrap(),
        fetched_at: Utc::now(),
    };

    let meta = extract(&doc, &url);
    assert!(meta.used_fallback);
}

#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn extract_never_panics(html in ".*") {
            let _ = extract_from(&html, "https://example.com/");
        }

        #[test]
        fn extracted_assets_are_absolute(html in ".*") {
            let meta = extract_from(&html, "https://example.com/");
            for asset in [&meta.og_image, &meta.twitter_image, &meta.favicon] {
                if let Some(value) = asset {
                    prop_assert!(
                        value.starts_with("http://") || value.starts_with("https://")
                    );
                }
            }
        }
    }
}
