//! Discord gateway adapter.
//!
//! Inbound messages are mapped to [`IncomingMessage`] and driven through the
//! [`CommandProcessor`]; reactions and replies go back through [`DiscordFeedback`].

use std::sync::Arc;

use anyhow::Context as _;
use async_trait::async_trait;
use odolog_commands::CommandProcessor;
use odolog_core::{Attachment, FeedbackChannel, IncomingMessage, Reaction};
use serenity::all::{
    ChannelId, CreateMessage, GatewayIntents, Http, Message as DiscordMessage, MessageId,
    ReactionType, Ready,
};
use serenity::prelude::*;
use tracing::{debug, error, info};

use crate::ChannelAdapter;

struct Handler {
    processor: Arc<CommandProcessor>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: DiscordMessage) {
        let incoming = incoming_message(&msg);
        let feedback = DiscordFeedback::new(ctx.http.clone(), msg.channel_id, msg.id);
        let outcome = self.processor.handle(&incoming, &feedback).await;
        debug!(message_id = %incoming.id, state = outcome.state_name(), "Discord message handled");
    }

    async fn ready(&self, _: Context, ready: Ready) {
        info!("{} is connected!", ready.user.name);
    }
}

/// Map a gateway message onto the platform-neutral shape.
pub fn incoming_message(msg: &DiscordMessage) -> IncomingMessage {
    IncomingMessage {
        id: msg.id.get().to_string(),
        channel_id: msg.channel_id.get().to_string(),
        author: msg.author.tag(),
        author_is_bot: msg.author.bot,
        content: msg.content.clone(),
        attachments: msg
            .attachments
            .iter()
            .map(|a| Attachment {
                url: a.url.clone(),
                filename: a.filename.clone(),
                content_type: a.content_type.clone(),
            })
            .collect(),
    }
}

pub fn reaction_type(reaction: Reaction) -> ReactionType {
    ReactionType::Unicode(reaction.emoji().to_string())
}

/// Feedback for one Discord message: reactions on it, replies referencing it.
pub struct DiscordFeedback {
    http: Arc<Http>,
    channel_id: ChannelId,
    message_id: MessageId,
}

impl DiscordFeedback {
    pub fn new(http: Arc<Http>, channel_id: ChannelId, message_id: MessageId) -> Self {
        Self { http, channel_id, message_id }
    }
}

#[async_trait]
impl FeedbackChannel for DiscordFeedback {
    async fn react(&self, reaction: Reaction) -> anyhow::Result<()> {
        self.channel_id
            .create_reaction(&self.http, self.message_id, reaction_type(reaction))
            .await
            .with_context(|| format!("adding {} reaction", reaction.emoji()))
    }

    async fn unreact(&self, reaction: Reaction) -> anyhow::Result<()> {
        // `None` removes the bot's own reaction.
        self.channel_id
            .delete_reaction(&self.http, self.message_id, None, reaction_type(reaction))
            .await
            .with_context(|| format!("removing {} reaction", reaction.emoji()))
    }

    async fn reply(&self, text: &str) -> anyhow::Result<()> {
        let builder = CreateMessage::new()
            .content(text)
            .reference_message((self.channel_id, self.message_id));
        self.channel_id
            .send_message(self.http.as_ref(), builder)
            .await
            .context("sending reply")?;
        Ok(())
    }
}

pub struct DiscordAdapter {
    token: String,
    processor: Arc<CommandProcessor>,
}

impl DiscordAdapter {
    pub fn new(token: String, processor: Arc<CommandProcessor>) -> Self {
        Self { token, processor }
    }

    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::GUILD_MESSAGE_REACTIONS
            | GatewayIntents::MESSAGE_CONTENT
    }
}

#[async_trait]
impl ChannelAdapter for DiscordAdapter {
    fn name(&self) -> &str {
        "discord"
    }

    async fn start(&self) -> anyhow::Result<()> {
        info!(
            prefix = %self.processor.settings().command_prefix,
            channel = ?self.processor.settings().channel_id,
            "Starting Discord adapter"
        );

        let mut client = Client::builder(&self.token, Self::intents())
            .event_handler(Handler { processor: self.processor.clone() })
            .await
            .context("building Discord client")?;

        if let Err(why) = client.start().await {
            error!("Client error: {:?}", why);
            anyhow::bail!("Discord client error: {:?}", why);
        }

        Ok(())
    }
}
