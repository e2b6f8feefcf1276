pub mod analyze;
pub mod config;
pub mod formats;
pub mod redact;

use anyhow::Result;
use docscrub_config::Config;
use docscrub_engine::Redactor;

/// Build the redactor off the async runtime; the Presidio backend uses a
/// blocking HTTP client.
pub async fn build_redactor(config: &Config) -> Result<Redactor> {
    let config = config.clone();
    tokio::task::spawn_blocking(move || Redactor::from_config(&config)).await?
}
