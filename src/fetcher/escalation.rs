//! Decides what to do with a failed primary fetch: try the headless
//! rendering fallback, or report the failure as-is.
//!
//! The split follows one rule. Statuses that bot-protection layers serve to
//! non-browser clients (and failures where no status was obtainable at all)
//! are worth retrying in a real browser engine. A clean application answer
//! like 404 or 500 is already the truth about the page; rendering it again
//! would only be slower.

use reqwest::StatusCode;

use crate::fetcher::errors::FetchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Retry the fetch through the headless rendering fallback.
    Escalate,
    /// Surface the failure unchanged.
    Surface,
}

/// Statuses that commonly mean "blocked", not "broken": auth walls, rate
/// limiters and anti-bot interstitials all serve real browsers.
const BLOCKING_STATUSES: [StatusCode; 4] = [
    StatusCode::UNAUTHORIZED,
    StatusCode::FORBIDDEN,
    StatusCode::TOO_MANY_REQUESTS,
    StatusCode::SERVICE_UNAVAILABLE,
];

pub fn classify(error: &FetchError) -> Disposition {
    match error {
        FetchError::Http { status } if BLOCKING_STATUSES.contains(status) => Disposition::Escalate,
        // Any other clean status (404, 410, 500, ...) is a real answer.
        FetchError::Http { .. } => Disposition::Surface,

        // No status came back; a browser engine may still get through.
        FetchError::ConnectTimeout
        | FetchError::RequestTimeout
        | FetchError::Dns(_)
        | FetchError::Tls(_)
        | FetchError::Io(_)
        | FetchError::Unknown(_) => Disposition::Escalate,

        // The server responded and the response itself was the problem.
        FetchError::RedirectLoop
        | FetchError::BodyTooLarge(_)
        | FetchError::UnsupportedContentType(_)
        | FetchError::Charset(_)
        | FetchError::InvalidUrl(_) => Disposition::Surface,

        // Never start a browser after the caller gave up.
        FetchError::Cancelled => Disposition::Surface,
    }
}
