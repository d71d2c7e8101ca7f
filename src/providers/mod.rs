mod logs;

pub use logs::{LogSource, RpcLogSource};

use alloy::providers::{Provider, ProviderBuilder};
use eyre::Result;
use reqwest::Url;

/// Creates an HTTP provider for the configured network endpoint
pub fn create_http_provider(url: &str) -> Result<impl Provider> {
    let url = Url::parse(url).map_err(|e| eyre::eyre!("Invalid network URL {}: {}", url, e))?;
    Ok(ProviderBuilder::new().connect_http(url))
}
