use std::sync::{Arc, OnceLock};

use serenity::async_trait;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::model::id::UserId;
use serenity::prelude::{Context, EventHandler};
use tracing::{debug, info};

use relaybot_agent::pipeline::{self, Verdict};
use relaybot_agent::RelayRuntime;

use crate::transport::{to_chat_message, SerenityTransport};

/// Serenity event handler wired to the relay pipeline.
pub struct RelayHandler {
    pub runtime: Arc<RelayRuntime>,
    pub typing_indicator: bool,
    pub bot_id: OnceLock<UserId>,
}

#[async_trait]
impl EventHandler for RelayHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        self.bot_id.set(ready.user.id).ok();
        info!(
            name = %ready.user.name,
            channel_id = self.runtime.target_channel(),
            "Discord bot connected"
        );
    }

    async fn message(&self, ctx: Context, msg: Message) {
        let event = to_chat_message(&msg);

        let verdict = pipeline::evaluate(
            &event,
            self.runtime.target_channel(),
            self.runtime.settings().command_prefix,
        );
        if let Verdict::Reject(reason) = verdict {
            debug!(message_id = event.id, ?reason, "ignoring message");
            return;
        }

        let bot_id = match self.bot_id.get() {
            Some(id) => id.get(),
            None => ctx.cache.current_user().id.get(),
        };

        let runtime = Arc::clone(&self.runtime);
        let transport = SerenityTransport::new(Arc::clone(&ctx.http), self.typing_indicator);

        // One task per message; each owns its error boundary.
        tokio::spawn(async move {
            pipeline::handle_message(&runtime, &transport, &event, bot_id).await;
        });
    }
}
