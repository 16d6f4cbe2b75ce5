use async_trait::async_trait;

pub mod discord;

pub use discord::{DiscordAdapter, DiscordFeedback};

/// Chat platform adapters implement this trait.
#[async_trait]
pub trait ChannelAdapter: Send + Sync {
    /// Human-readable adapter name for logging.
    fn name(&self) -> &str;

    /// Connect and feed inbound messages to the command processor until the connection ends.
    async fn start(&self) -> anyhow::Result<()>;
}
