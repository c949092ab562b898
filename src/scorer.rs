//! Turns an extracted record plus probe results into a 0-100 score with a
//! prioritized issue list.
//!
//! Scoring is pure and blunt: a fixed rule table with fixed deductions and
//! messages. The rules run in a fixed order and fire independently, so the
//! same page always produces the same scorecard with issues in the same
//! order.

use serde::{Deserialize, Serialize};

use crate::extractor::Metadata;

const MAX_TITLE_CHARS: usize = 60;
const MAX_DESCRIPTION_CHARS: usize = 160;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssuePriority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub priority: IssuePriority,
    pub message: String,
}

impl Issue {
    fn high(message: &str) -> Self {
        Self {
            priority: IssuePriority::High,
            message: message.to_string(),
        }
    }

    fn medium(message: &str) -> Self {
        Self {
            priority: IssuePriority::Medium,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scorecard {
    pub score: u8,
    pub issues: Vec<Issue>,
}

/// Score an extracted record. `twitter_reachable` is accepted but does not
/// currently move the score; every major platform falls back to the og
/// card, which is what the rules below judge.
pub fn score(metadata: &Metadata, og_reachable: bool, _twitter_reachable: bool) -> Scorecard {
    let mut score: i32 = 100;
    let mut issues = Vec::new();

    match (&metadata.og_image, og_reachable) {
        (None, _) => {
            score -= 30;
            issues.push(Issue::high("Missing social share image (og:image)"));
        }
        (Some(_), false) => {
            score -= 30;
            issues.push(Issue::high(
                "Social share image appears broken or inaccessible (404/restricted)",
            ));
        }
        (Some(_), true) => {}
    }

    if metadata.description.is_none() && metadata.og_description.is_none() {
        score -= 20;
        issues.push(Issue::high("Missing meta description"));
    }

    if let Some(title) = &metadata.title
        && title.chars().count() > MAX_TITLE_CHARS
    {
        score -= 10;
        issues.push(Issue::medium("Title is too long (> 60 chars)"));
    }

    if let Some(description) = &metadata.description
        && description.chars().count() > MAX_DESCRIPTION_CHARS
    {
        score -= 10;
        issues.push(Issue::medium("Description is too long (> 160 chars)"));
    }

    Scorecard {
        score: score.max(0) as u8,
        issues,
    }
}
