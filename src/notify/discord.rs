use super::{AlertChannel, ALERT_WINDOW_MINUTES};
use crate::config::DiscordConfig;
use crate::opensea::Collection;
use async_trait::async_trait;
use eyre::{eyre, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};

pub const DEFAULT_HOST: &str = "https://discord.com";

/// Posts mint alerts through a Discord webhook
pub struct DiscordNotifier {
    http: reqwest::Client,
    host: String,
    config: Option<DiscordConfig>,
}

#[derive(Serialize)]
struct ExecuteParams<'a> {
    content: &'a str,
    embeds: Vec<Embed<'a>>,
}

#[derive(Serialize)]
struct Embed<'a> {
    image: EmbedImage<'a>,
}

#[derive(Serialize)]
struct EmbedImage<'a> {
    url: &'a str,
}

#[derive(Deserialize)]
struct ExecuteResponse {
    id: String,
}

impl DiscordNotifier {
    pub fn new(config: Option<DiscordConfig>) -> Self {
        Self::with_host(DEFAULT_HOST, config)
    }

    pub fn with_host(host: impl Into<String>, config: Option<DiscordConfig>) -> Self {
        Self {
            http: reqwest::Client::new(),
            host: host.into(),
            config,
        }
    }

    fn format_alert(collection: &Collection, count: usize) -> String {
        format!(
            "Mint Alert!\n\n**[{}]({})**\n\n**{} minted** in **{} minutes**\n",
            collection.name, collection.collection.external_url, count, ALERT_WINDOW_MINUTES
        )
    }
}

#[async_trait]
impl AlertChannel for DiscordNotifier {
    fn name(&self) -> &'static str {
        "discord"
    }

    async fn send(&self, collection: &Collection, count: usize) -> Result<()> {
        let Some(config) = &self.config else {
            info!("Discord webhook id and/or webhook token not configured.");
            return Ok(());
        };
        // Webhook ids are numeric snowflakes
        if config.webhook_id.parse::<u64>().is_err() {
            warn!("Invalid Discord webhook id: {}", config.webhook_id);
            return Ok(());
        }

        let alert = Self::format_alert(collection, count);
        let params = ExecuteParams {
            content: &alert,
            embeds: vec![Embed {
                image: EmbedImage {
                    url: &collection.image_url,
                },
            }],
        };

        let url = format!(
            "{}/api/webhooks/{}/{}?wait=true",
            self.host, config.webhook_id, config.webhook_token
        );
        let response = self.http.post(&url).json(&params).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(eyre!("Discord webhook error (status {}): {}", status, body));
        }

        let message: ExecuteResponse = response.json().await?;
        info!("Discord message sent. Message ID: {}", message.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opensea::CollectionDetails;

    fn collection() -> Collection {
        Collection {
            name: "Test Apes".to_string(),
            external_link: "https://example.com".to_string(),
            image_url: "https://example.com/ape.png".to_string(),
            collection: CollectionDetails {
                slug: "test-apes".to_string(),
                external_url: "https://example.com".to_string(),
                twitter_username: "testapes".to_string(),
            },
        }
    }

    #[test]
    fn alert_embeds_name_link_and_count() {
        let alert = DiscordNotifier::format_alert(&collection(), 150);
        assert_eq!(
            alert,
            "Mint Alert!\n\n**[Test Apes](https://example.com)**\n\n**150 minted** in **10 minutes**\n"
        );
    }

    #[tokio::test]
    async fn executes_webhook_and_reads_message_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/webhooks/1234/secret-token")
            .match_query(mockito::Matcher::UrlEncoded(
                "wait".to_string(),
                "true".to_string(),
            ))
            .match_body(mockito::Matcher::PartialJsonString(
                r#"{"embeds": [{"image": {"url": "https://example.com/ape.png"}}]}"#.to_string(),
            ))
            .with_status(200)
            .with_body(r#"{"id": "99887766"}"#)
            .create_async()
            .await;

        let notifier = DiscordNotifier::with_host(
            server.url(),
            Some(DiscordConfig {
                webhook_id: "1234".to_string(),
                webhook_token: "secret-token".to_string(),
            }),
        );

        notifier.send(&collection(), 150).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn missing_credentials_skip_without_error() {
        let notifier = DiscordNotifier::new(None);
        assert!(notifier.send(&collection(), 150).await.is_ok());
    }

    #[tokio::test]
    async fn non_numeric_webhook_id_skips_without_error() {
        let notifier = DiscordNotifier::with_host(
            "http://127.0.0.1:1",
            Some(DiscordConfig {
                webhook_id: "not-a-snowflake".to_string(),
                webhook_token: "t".to_string(),
            }),
        );
        assert!(notifier.send(&collection(), 150).await.is_ok());
    }

    #[tokio::test]
    async fn provider_failure_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/webhooks/1234/secret-token")
            .match_query(mockito::Matcher::Any)
            .with_status(500)
            .with_body("internal error")
            .create_async()
            .await;

        let notifier = DiscordNotifier::with_host(
            server.url(),
            Some(DiscordConfig {
                webhook_id: "1234".to_string(),
                webhook_token: "secret-token".to_string(),
            }),
        );

        assert!(notifier.send(&collection(), 150).await.is_err());
    }
}
