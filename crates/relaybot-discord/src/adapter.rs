use std::sync::{Arc, OnceLock};

use serenity::model::gateway::GatewayIntents;
use serenity::Client;
use tracing::info;

use relaybot_agent::RelayRuntime;
use relaybot_core::config::DiscordConfig;

use crate::error::DiscordError;
use crate::handler::RelayHandler;

/// Discord channel adapter.
///
/// Wraps a serenity `Client` and drives the gateway until it stops. Serenity
/// resumes dropped sessions on its own; a rejected login ends `run` with an
/// error.
pub struct DiscordAdapter {
    runtime: Arc<RelayRuntime>,
    config: DiscordConfig,
}

impl DiscordAdapter {
    pub fn new(config: &DiscordConfig, runtime: Arc<RelayRuntime>) -> Self {
        Self {
            runtime,
            config: config.clone(),
        }
    }

    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT
    }

    /// Log in and process events until the gateway shuts down.
    pub async fn run(self) -> Result<(), DiscordError> {
        let mut client = self.build_client().await?;

        info!("Discord: gateway connecting");
        client.start().await?;

        info!("Discord: gateway stopped");
        Ok(())
    }

    async fn build_client(&self) -> Result<Client, DiscordError> {
        if self.config.bot_token.trim().is_empty() {
            return Err(DiscordError::NoToken);
        }

        let handler = RelayHandler {
            runtime: Arc::clone(&self.runtime),
            typing_indicator: self.config.typing_indicator,
            bot_id: OnceLock::new(),
        };

        let client = Client::builder(&self.config.bot_token, Self::intents())
            .event_handler(handler)
            .await?;
        Ok(client)
    }
}
