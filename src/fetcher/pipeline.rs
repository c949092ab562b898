//! Byte-to-string stage of retrieval: figure out what encoding a page is
//! actually in, then decode it to UTF-8 for the extractor.
//!
//! Charset is resolved in order of trustworthiness: the `Content-Type`
//! header, then a `<meta>` declaration sniffed from the first 4KB, then a
//! heuristic guess over the same window.

use bytes::Bytes;
use encoding_rs::Encoding;
use regex::Regex;
use std::sync::LazyLock;

use crate::fetcher::errors::FetchError;

/// How many leading bytes the meta sniffers and the heuristic detector see.
const SNIFF_WINDOW: usize = 4096;

static HEADER_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

static META_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s/>]+)"#).unwrap());

static META_HTTP_EQUIV: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\s+[^>]*?http-equiv\s*=\s*["']?content-type["']?[^>]*?content\s*=\s*["']?[^"'>]*?charset\s*=\s*([^"'\s;/>]+)"#).unwrap()
});

/// Decode a response body to UTF-8, erroring when the bytes do not form
/// valid text in the resolved encoding.
pub fn decode_html(body: Bytes, content_type: &str) -> Result<String, FetchError> {
    let encoding = sniff_encoding(content_type, &body);
    let (decoded, _, had_errors) = encoding.decode(&body);

    if had_errors {
        return Err(FetchError::Charset(format!(
            "body is not valid {}",
            encoding.name()
        )));
    }

    Ok(decoded.into_owned())
}

fn sniff_encoding(content_type: &str, body: &[u8]) -> &'static Encoding {
    if let Some(encoding) = labelled_encoding(&HEADER_CHARSET, content_type) {
        return encoding;
    }

    let window = &body[..body.len().min(SNIFF_WINDOW)];
    let window_str = String::from_utf8_lossy(window);

    if let Some(encoding) = labelled_encoding(&META_CHARSET, &window_str) {
        return encoding;
    }
    if let Some(encoding) = labelled_encoding(&META_HTTP_EQUIV, &window_str) {
        return encoding;
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(window, false);
    detector.guess(None, true)
}

fn labelled_encoding(pattern: &Regex, haystack: &str) -> Option<&'static Encoding> {
    let label = pattern.captures(haystack)?.get(1)?.as_str();
    Encoding::for_label(label.as_bytes())
}
