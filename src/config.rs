use std::env;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),
}

/// Discord webhook credentials
#[derive(Debug, Clone)]
pub struct DiscordConfig {
    pub webhook_id: String,
    pub webhook_token: String,
}

/// Twitter OAuth 1.0a user-context credentials
#[derive(Debug, Clone)]
pub struct TwitterConfig {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

/// Application configuration, read from the environment once at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub eth_network_url: String,
    pub state_dir: PathBuf,
    pub state_bucket: String,
    pub state_key: String,
    pub opensea_api_key: String,
    /// None disables the Discord channel
    pub discord: Option<DiscordConfig>,
    /// None disables the Twitter channel
    pub twitter: Option<TwitterConfig>,
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}

impl Config {
    /// Build the configuration from environment variables. Missing required
    /// values abort before any network call; a channel with incomplete
    /// credentials is disabled rather than fatal.
    pub fn from_env() -> Result<Self, ConfigError> {
        let discord = match (
            optional("DISCORD_WEBHOOK_ID"),
            optional("DISCORD_WEBHOOK_TOKEN"),
        ) {
            (Some(webhook_id), Some(webhook_token)) => Some(DiscordConfig {
                webhook_id,
                webhook_token,
            }),
            _ => None,
        };

        let twitter = match (
            optional("TWITTER_CONSUMER_KEY"),
            optional("TWITTER_CONSUMER_SECRET"),
            optional("TWITTER_ACCESS_TOKEN"),
            optional("TWITTER_ACCESS_TOKEN_SECRET"),
        ) {
            (Some(consumer_key), Some(consumer_secret), Some(access_token), Some(access_token_secret)) => {
                Some(TwitterConfig {
                    consumer_key,
                    consumer_secret,
                    access_token,
                    access_token_secret,
                })
            }
            _ => None,
        };

        Ok(Self {
            eth_network_url: required("ETH_NETWORK_URL")?,
            state_dir: optional("STATE_DIR").unwrap_or_else(|| "state".to_string()).into(),
            state_bucket: required("STATE_BUCKET")?,
            state_key: required("STATE_KEY")?,
            opensea_api_key: required("OPENSEA_API_KEY")?,
            discord,
            twitter,
        })
    }
}
