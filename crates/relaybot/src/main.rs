use std::sync::Arc;

use anyhow::Context as _;
use tracing::info;

use relaybot_agent::{OpenAiProvider, RelayRuntime};
use relaybot_core::RelayConfig;
use relaybot_discord::DiscordAdapter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "relaybot=info,relaybot_discord=info,relaybot_agent=info".into()
            }),
        )
        .init();

    // config: RELAYBOT_CONFIG > ./relaybot.toml, then env overrides
    let config = RelayConfig::load(None).context("loading relaybot config")?;

    let provider = OpenAiProvider::new(
        config.openai.api_key.clone(),
        Some(config.openai.base_url.clone()),
    );
    let runtime = Arc::new(RelayRuntime::from_config(&config, Box::new(provider)));
    info!(
        model = %runtime.model(),
        channel_id = runtime.target_channel(),
        history_limit = runtime.settings().history_limit,
        "relay configured"
    );

    // a rejected login is fatal; there is no degraded mode
    DiscordAdapter::new(&config.discord, runtime)
        .run()
        .await
        .context("Discord gateway failed")?;

    Ok(())
}
