use super::{oauth, AlertChannel, ALERT_WINDOW_MINUTES};
use crate::config::TwitterConfig;
use crate::opensea::Collection;
use async_trait::async_trait;
use eyre::{eyre, Result};
use log::info;
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};

pub const DEFAULT_HOST: &str = "https://api.twitter.com";

const HASHTAGS: &str =
    "#nft #nfts #nftcollection #nftcollectibles #nftminting #niftyscoops #NFTsales";

/// Posts mint alerts to the Twitter v2 API with OAuth 1.0a user context
pub struct TwitterNotifier {
    http: reqwest::Client,
    host: String,
    config: Option<TwitterConfig>,
}

#[derive(Serialize)]
struct CreatePostRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct CreatePostResponse {
    data: CreatedPost,
}

#[derive(Deserialize)]
struct CreatedPost {
    id: String,
}

impl TwitterNotifier {
    pub fn new(config: Option<TwitterConfig>) -> Self {
        Self::with_host(DEFAULT_HOST, config)
    }

    pub fn with_host(host: impl Into<String>, config: Option<TwitterConfig>) -> Self {
        Self {
            http: reqwest::Client::new(),
            host: host.into(),
            config,
        }
    }

    fn format_post(collection: &Collection, count: usize) -> String {
        let link = format!(
            "https://opensea.io/collection/{}",
            collection.collection.slug
        );
        format!(
            "NFTs Mint Alert: {} sold in {} minutes. \nHead on over and have a look\n {} \n\n {}",
            count, ALERT_WINDOW_MINUTES, link, HASHTAGS
        )
    }
}

#[async_trait]
impl AlertChannel for TwitterNotifier {
    fn name(&self) -> &'static str {
        "twitter"
    }

    async fn send(&self, collection: &Collection, count: usize) -> Result<()> {
        let Some(config) = &self.config else {
            info!("Twitter credentials not configured.");
            return Ok(());
        };

        let text = Self::format_post(collection, count);
        let url = format!("{}/2/tweets", self.host);
        let authorization = oauth::authorization_header("POST", &url, config);

        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, authorization)
            .json(&CreatePostRequest { text: &text })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(eyre!("Twitter API error (status {}): {}", status, body));
        }

        let created: CreatePostResponse = response.json().await?;
        info!("Tweet sent. Tweet ID: {}", created.data.id);
        Ok(())
    }
}
