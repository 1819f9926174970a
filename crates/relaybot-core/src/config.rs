use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{RelayError, Result};

pub const DEFAULT_CONFIG_PATH: &str = "relaybot.toml";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_PERSONA: &str = "You are a friendly chatbot.";
pub const DEFAULT_HISTORY_LIMIT: u8 = 15;
pub const DEFAULT_COMMAND_PREFIX: char = '!';
/// Discord returns at most 100 messages per history page.
pub const MAX_HISTORY_LIMIT: u8 = 100;

/// Top-level config (relaybot.toml + RELAYBOT_* env overrides + legacy env names).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    pub discord: DiscordConfig,
    pub openai: OpenAiConfig,
    #[serde(default)]
    pub relay: RelaySettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordConfig {
    pub bot_token: String,
    /// The only channel the bot listens and replies in.
    pub channel_id: u64,
    /// Show "bot is typing…" while the completion is generated.
    #[serde(default = "bool_true")]
    pub typing_indicator: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    pub api_key: String,
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
}

/// Conversation-shaping knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelaySettings {
    #[serde(default = "default_persona")]
    pub persona: String,
    /// Clamped to `1..=MAX_HISTORY_LIMIT` while deserializing.
    #[serde(
        default = "default_history_limit",
        deserialize_with = "deserialize_history_limit"
    )]
    pub history_limit: u8,
    #[serde(default = "default_command_prefix")]
    pub command_prefix: char,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            persona: default_persona(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            command_prefix: DEFAULT_COMMAND_PREFIX,
        }
    }
}

fn bool_true() -> bool {
    true
}
fn default_openai_base_url() -> String {
    "https://api.openai.com".to_string()
}
fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}
fn default_persona() -> String {
    DEFAULT_PERSONA.to_string()
}
fn default_history_limit() -> u8 {
    DEFAULT_HISTORY_LIMIT
}
fn default_command_prefix() -> char {
    DEFAULT_COMMAND_PREFIX
}

/// Accept any integer and clamp it, so an out-of-range window never fails startup.
fn deserialize_history_limit<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let requested = i64::deserialize(deserializer)?;
    let used = requested.clamp(1, i64::from(MAX_HISTORY_LIMIT));
    if used != requested {
        tracing::warn!(requested, used, "relay.history_limit out of range, clamped");
    }
    // in 1..=100 after the clamp
    Ok(used as u8)
}

impl RelayConfig {
    /// Load config from a TOML file with env var overrides.
    ///
    /// Later layers win:
    ///   1. `config_path`, else `RELAYBOT_CONFIG`, else `./relaybot.toml` (may be absent)
    ///   2. `RELAYBOT_*` with `__` as the nesting separator
    ///   3. `TOKEN`, `CHANNEL_ID`, `OPENAI_API_KEY`
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let path = config_path
            .map(String::from)
            .or_else(|| std::env::var("RELAYBOT_CONFIG").ok())
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

        tracing::debug!(path = %path, "loading relaybot config");
        Self::from_figment(Self::figment(&path))
    }

    /// The layered provider stack used by [`RelayConfig::load`].
    pub fn figment(path: &str) -> Figment {
        Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("RELAYBOT_").split("__"))
            .merge(legacy_env())
    }

    /// Extract and validate a config from any figment.
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: RelayConfig = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.discord.bot_token.trim().is_empty() {
            return Err(RelayError::InvalidSetting {
                key: "discord.bot_token",
                reason: "must not be empty".to_string(),
            });
        }
        if self.openai.api_key.trim().is_empty() {
            return Err(RelayError::InvalidSetting {
                key: "openai.api_key",
                reason: "must not be empty".to_string(),
            });
        }
        if self.discord.channel_id == 0 {
            return Err(RelayError::InvalidSetting {
                key: "discord.channel_id",
                reason: "must be a non-zero channel id".to_string(),
            });
        }
        Ok(())
    }
}

/// Flat variable names understood by the bot's original deployment.
fn legacy_env() -> Env {
    Env::raw()
        .only(&["TOKEN", "CHANNEL_ID", "OPENAI_API_KEY"])
        .map(|key| {
            if key == "TOKEN" {
                "discord.bot_token".into()
            } else if key == "CHANNEL_ID" {
                "discord.channel_id".into()
            } else {
                "openai.api_key".into()
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    const MINIMAL: &str = r#"
        [discord]
        bot_token = "discord-token"
        channel_id = 1234567890

        [openai]
        api_key = "sk-test"
    "#;

    #[test]
    fn minimal_toml_fills_defaults() {
        let config = RelayConfig::from_figment(Figment::new().merge(Toml::string(MINIMAL)))
            .expect("minimal config should load");

        assert_eq!(config.discord.channel_id, 1234567890);
        assert!(config.discord.typing_indicator);
        assert_eq!(config.openai.model, DEFAULT_MODEL);
        assert_eq!(config.openai.base_url, "https://api.openai.com");
        assert_eq!(config.relay, RelaySettings::default());
        assert_eq!(config.relay.history_limit, 15);
        assert_eq!(config.relay.command_prefix, '!');
    }

    #[test]
    fn missing_token_is_an_error() {
        let toml = r#"
            [discord]
            channel_id = 1

            [openai]
            api_key = "sk-test"
        "#;
        let err = RelayConfig::from_figment(Figment::new().merge(Toml::string(toml))).unwrap_err();
        assert!(matches!(err, RelayError::Config(_)));
    }

    #[test]
    fn blank_api_key_is_rejected() {
        let toml = r#"
            [discord]
            bot_token = "t"
            channel_id = 1

            [openai]
            api_key = "  "
        "#;
        let err = RelayConfig::from_figment(Figment::new().merge(Toml::string(toml))).unwrap_err();
        assert!(matches!(
            err,
            RelayError::InvalidSetting {
                key: "openai.api_key",
                ..
            }
        ));
    }

    #[test]
    fn history_limit_is_clamped() {
        let toml = format!("{MINIMAL}\n[relay]\nhistory_limit = 250\n");
        let config = RelayConfig::from_figment(Figment::new().merge(Toml::string(&toml))).unwrap();
        assert_eq!(config.relay.history_limit, MAX_HISTORY_LIMIT);

        let toml = format!("{MINIMAL}\n[relay]\nhistory_limit = 0\n");
        let config = RelayConfig::from_figment(Figment::new().merge(Toml::string(&toml))).unwrap();
        assert_eq!(config.relay.history_limit, 1);
    }

    #[test]
    fn history_limit_outside_u8_is_clamped_not_rejected() {
        for (raw, expected) in [("500", MAX_HISTORY_LIMIT), ("-1", 1), ("100000", MAX_HISTORY_LIMIT)] {
            let toml = format!("{MINIMAL}\n[relay]\nhistory_limit = {raw}\n");
            let config = RelayConfig::from_figment(Figment::new().merge(Toml::string(&toml)))
                .unwrap_or_else(|e| panic!("history_limit = {raw} should load: {e}"));
            assert_eq!(config.relay.history_limit, expected, "history_limit = {raw}");
        }
    }

    #[test]
    fn history_limit_from_env_is_clamped() {
        Jail::expect_with(|jail| {
            jail.create_file("relaybot.toml", MINIMAL)?;
            jail.set_env("RELAYBOT_RELAY__HISTORY_LIMIT", "500");

            let config = RelayConfig::from_figment(RelayConfig::figment("relaybot.toml"))
                .expect("config should load");
            assert_eq!(config.relay.history_limit, MAX_HISTORY_LIMIT);
            Ok(())
        });
    }

    #[test]
    fn legacy_env_names_override_file() {
        Jail::expect_with(|jail| {
            jail.create_file("relaybot.toml", MINIMAL)?;
            jail.set_env("TOKEN", "from-env");
            jail.set_env("CHANNEL_ID", "987654321");
            jail.set_env("OPENAI_API_KEY", "sk-env");

            let config = RelayConfig::from_figment(RelayConfig::figment("relaybot.toml"))
                .expect("config should load");
            assert_eq!(config.discord.bot_token, "from-env");
            assert_eq!(config.discord.channel_id, 987654321);
            assert_eq!(config.openai.api_key, "sk-env");
            Ok(())
        });
    }

    #[test]
    fn prefixed_env_reaches_nested_keys() {
        Jail::expect_with(|jail| {
            jail.create_file("relaybot.toml", MINIMAL)?;
            jail.set_env("RELAYBOT_OPENAI__MODEL", "gpt-4o-mini");
            jail.set_env("RELAYBOT_RELAY__PERSONA", "You are terse.");
            jail.set_env("RELAYBOT_DISCORD__TYPING_INDICATOR", "false");

            let config = RelayConfig::from_figment(RelayConfig::figment("relaybot.toml"))
                .expect("config should load");
            assert_eq!(config.openai.model, "gpt-4o-mini");
            assert_eq!(config.relay.persona, "You are terse.");
            assert!(!config.discord.typing_indicator);
            Ok(())
        });
    }

    #[test]
    fn env_only_config_without_file() {
        Jail::expect_with(|jail| {
            jail.set_env("TOKEN", "t");
            jail.set_env("CHANNEL_ID", "5");
            jail.set_env("OPENAI_API_KEY", "k");

            let config = RelayConfig::from_figment(RelayConfig::figment("missing.toml"))
                .expect("env alone should be enough");
            assert_eq!(config.discord.channel_id, 5);
            Ok(())
        });
    }
}
