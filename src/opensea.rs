use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_HOST: &str = "https://api.opensea.io";

/// Errors from the marketplace metadata API. Any variant aborts the remaining
/// announcement candidates for the run.
#[derive(Debug, Error)]
pub enum OpenSeaError {
    #[error("contract not found")]
    NotFound,
    #[error("rate limited")]
    RateLimited,
    #[error("api error (status {status}) {title}: {detail}")]
    Api {
        status: u16,
        title: String,
        detail: String,
    },
    #[error("unexpected response (status {status}) from {url}")]
    Status { status: u16, url: String },
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Nested collection details of an asset-contract response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollectionDetails {
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub external_url: String,
    #[serde(default)]
    pub twitter_username: String,
}

/// The slice of collection metadata the alerter consumes
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Collection {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub external_link: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub collection: CollectionDetails,
}

#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    title: String,
    #[serde(default)]
    detail: String,
}

/// Marketplace metadata lookup per contract
#[async_trait]
pub trait CollectionApi: Send + Sync {
    async fn asset_contract(&self, address: &str) -> Result<Collection, OpenSeaError>;
}

/// OpenSea REST client
pub struct OpenSeaClient {
    http: reqwest::Client,
    host: String,
    api_key: String,
}

impl OpenSeaClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_host(DEFAULT_HOST, api_key)
    }

    pub fn with_host(host: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            host: host.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl CollectionApi for OpenSeaClient {
    async fn asset_contract(&self, address: &str) -> Result<Collection, OpenSeaError> {
        let url = format!("{}/api/v1/asset_contract/{}", self.host, address);
        let response = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .header("X-API-KEY", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            Ok(serde_json::from_str(&body)?)
        } else if status == StatusCode::NOT_FOUND {
            Err(OpenSeaError::NotFound)
        } else if status == StatusCode::TOO_MANY_REQUESTS {
            Err(OpenSeaError::RateLimited)
        } else {
            // Error bodies are usually JSON, but 4xx pages can be HTML
            match serde_json::from_str::<ApiErrorBody>(&body) {
                Ok(e) => Err(OpenSeaError::Api {
                    status: status.as_u16(),
                    title: e.title,
                    detail: e.detail,
                }),
                Err(_) => Err(OpenSeaError::Status {
                    status: status.as_u16(),
                    url,
                }),
            }
        }
    }
}
