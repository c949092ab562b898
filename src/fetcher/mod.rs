pub mod client;
pub mod errors;
pub mod escalation;
pub mod pipeline;
pub mod renderer;
pub mod types;

pub use client::Retriever;
pub use errors::FetchError;
pub use renderer::{ChromiumRenderer, PageRenderer, RenderError, RenderSession};
pub use types::{BaseUrl, RetrievedDocument};
