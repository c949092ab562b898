//! Social-preview inspection engine.
//!
//! Give it a public URL and it returns how that page will look when shared:
//! the normalized Open Graph / Twitter metadata, whether the preview images
//! actually load, and a 0-100 score with a prioritized issue list.
//!
//! Pages that block plain HTTP clients are retried through a disposable
//! headless browser; see [`fetcher`] for the escalation rules.
//!
//! ```rust,no_run
//! use ogaudit::{Config, Inspector};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let inspector = Inspector::new(&Config::default());
//!     let report = inspector.inspect("https://www.rust-lang.org").await?;
//!     println!("score {} with {} issues", report.score, report.issues.len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod extractor;
pub mod fetcher;
pub mod inspector;
pub mod resolver;
pub mod scorer;
pub mod verifier;

pub use config::Config;
pub use extractor::Metadata;
pub use inspector::{InspectError, InspectionResult, Inspector};
pub use scorer::{Issue, IssuePriority, Scorecard};
pub use verifier::Verifier;
