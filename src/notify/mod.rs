mod discord;
mod oauth;
mod twitter;

pub use discord::DiscordNotifier;
pub use twitter::TwitterNotifier;

use crate::opensea::Collection;
use async_trait::async_trait;
use eyre::Result;

/// Label for the scan window baked into the alert templates
pub const ALERT_WINDOW_MINUTES: u32 = 10;

/// An outbound alert channel. Sends are best-effort: a failing channel is
/// logged by the caller and never blocks the other channels or the run.
#[async_trait]
pub trait AlertChannel: Send + Sync {
    fn name(&self) -> &'static str;
    async fn send(&self, collection: &Collection, count: usize) -> Result<()>;
}
