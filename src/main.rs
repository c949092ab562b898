use anyhow::Context;
use ogaudit::{Config, Inspector};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries only the JSON result.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("ogaudit=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let url = std::env::args()
        .nth(1)
        .context("usage: ogaudit <url>")?;

    let config = Config::from_env()?;
    let inspector = Inspector::new(&config);
    let result = inspector.inspect(&url).await?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
