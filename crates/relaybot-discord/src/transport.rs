use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;
use serenity::builder::GetMessages;
use serenity::http::Http;
use serenity::model::channel::Message;
use serenity::model::id::{ChannelId, MessageId};

use relaybot_agent::pipeline::{ChannelTransport, TransportError};
use relaybot_core::{Author, ChatMessage};

use crate::send;

/// [`ChannelTransport`] over Discord's REST API.
///
/// Holds only the `Arc<Http>` handle, so it is cheap to build per message and
/// stays valid across gateway reconnects.
pub struct SerenityTransport {
    http: Arc<Http>,
    typing_indicator: bool,
}

impl SerenityTransport {
    pub fn new(http: Arc<Http>, typing_indicator: bool) -> Self {
        Self {
            http,
            typing_indicator,
        }
    }
}

#[async_trait]
impl ChannelTransport for SerenityTransport {
    async fn fetch_recent(
        &self,
        channel_id: u64,
        limit: u8,
    ) -> Result<Vec<ChatMessage>, TransportError> {
        let messages = ChannelId::new(channel_id)
            .messages(&self.http, GetMessages::new().limit(limit))
            .await
            .map_err(|e| TransportError::History(e.to_string()))?;
        Ok(messages.iter().map(to_chat_message).collect())
    }

    async fn start_typing(&self, channel_id: u64) -> Result<(), TransportError> {
        if !self.typing_indicator {
            return Ok(());
        }
        ChannelId::new(channel_id)
            .broadcast_typing(&self.http)
            .await
            .map_err(|e| TransportError::Typing(e.to_string()))
    }

    async fn reply(&self, to: &ChatMessage, content: &str) -> Result<(), TransportError> {
        send::send_reply(
            &self.http,
            ChannelId::new(to.channel_id),
            MessageId::new(to.id),
            content,
        )
        .await
        .map_err(|e| TransportError::Send(e.to_string()))
    }
}

/// Project a serenity message onto the fields the relay reads.
pub fn to_chat_message(msg: &Message) -> ChatMessage {
    ChatMessage {
        id: msg.id.get(),
        channel_id: msg.channel_id.get(),
        author: Author {
            id: msg.author.id.get(),
            name: msg.author.name.clone(),
            bot: msg.author.bot,
        },
        content: msg.content.clone(),
        timestamp: DateTime::from_timestamp(msg.timestamp.unix_timestamp(), 0).unwrap_or_default(),
    }
}
