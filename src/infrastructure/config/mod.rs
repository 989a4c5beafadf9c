//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use crate::application::errors::ConfigError;

/// Rover/camera combinations chart shown when a pair is rejected
pub const COMBINATIONS_IMAGE: &str =
    "https://cdn.discordapp.com/attachments/704387250351243425/1092897819410579647/nasa_cams.png";

/// Bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub bot: BotConfig,
    pub nasa: NasaConfig,
    #[serde(default)]
    pub interaction: InteractionConfig,
    pub adapters: AdaptersConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub name: String,
    pub prefix: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct NasaConfig {
    /// Usually supplied through NASA_API_KEY
    pub api_key: Option<String>,
    pub base_url: String,
    pub cooldown_seconds: u64,
    pub request_timeout_seconds: u64,
    pub combinations_image: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct InteractionConfig {
    /// Idle time before a "More info" button stops working
    pub detail_timeout_seconds: u64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self { detail_timeout_seconds: 60 }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AdaptersConfig {
    pub telegram: Option<TelegramConfig>,
    pub console: Option<ConsoleConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TelegramConfig {
    pub enabled: bool,
    pub token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConsoleConfig {
    pub enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                name: "mars-bot".to_string(),
                prefix: "/".to_string(),
            },
            nasa: NasaConfig {
                api_key: None,
                base_url: "https://api.nasa.gov/mars-photos/api/v1".to_string(),
                cooldown_seconds: 180,
                request_timeout_seconds: 30,
                combinations_image: COMBINATIONS_IMAGE.to_string(),
            },
            interaction: InteractionConfig::default(),
            adapters: AdaptersConfig {
                telegram: Some(TelegramConfig {
                    enabled: false,
                    token: None,
                }),
                console: Some(ConsoleConfig {
                    enabled: true,
                }),
            },
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))?;

        Ok(config.with_env())
    }

    pub fn load_env() -> Self {
        Config::default().with_env()
    }

    /// Apply environment overrides on top of file or default values
    pub fn with_env(mut self) -> Self {
        if let Ok(token) = std::env::var("BOT_TOKEN") {
            let tg = self.adapters.telegram.get_or_insert(TelegramConfig {
                enabled: true,
                token: None,
            });
            tg.token = Some(token);
            tg.enabled = true;
        }

        if let Ok(prefix) = std::env::var("BOT_PREFIX") {
            self.bot.prefix = prefix;
        }

        if let Ok(key) = std::env::var("NASA_API_KEY") {
            self.nasa.api_key = Some(key);
        }

        self
    }

    /// API key for the photo API; the bot cannot start without one
    pub fn nasa_api_key(&self) -> Result<&str, ConfigError> {
        self.nasa
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingField("NASA_API_KEY".to_string()))
    }

    /// Telegram token, if the Telegram adapter is enabled
    pub fn telegram_token(&self) -> Option<&str> {
        self.adapters
            .telegram
            .as_ref()
            .filter(|t| t.enabled)
            .and_then(|t| t.token.as_deref())
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.nasa.cooldown_seconds)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.nasa.request_timeout_seconds)
    }

    pub fn detail_timeout(&self) -> Duration {
        Duration::from_secs(self.interaction.detail_timeout_seconds)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.cooldown(), Duration::from_secs(180));
        assert_eq!(config.detail_timeout(), Duration::from_secs(60));
        assert_eq!(config.nasa.base_url, "https://api.nasa.gov/mars-photos/api/v1");
        assert!(config.telegram_token().is_none());
        assert!(matches!(config.nasa_api_key(), Err(ConfigError::MissingField(_))));
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
bot:
  name: rover
  prefix: "!"
nasa:
  api-key: DEMO_KEY
  base-url: http://localhost:9000
  cooldown-seconds: 5
  request-timeout-seconds: 2
  combinations-image: ""
adapters:
  telegram:
    enabled: true
    token: "123:abc"
"#;
        let config: Config = serde_yaml::from_str(yaml).expect("valid yaml");
        assert_eq!(config.bot.prefix, "!");
        assert_eq!(config.nasa_api_key().ok(), Some("DEMO_KEY"));
        assert_eq!(config.cooldown(), Duration::from_secs(5));
        assert_eq!(config.detail_timeout(), Duration::from_secs(60));
        assert_eq!(config.telegram_token(), Some("123:abc"));
        assert!(config.adapters.console.is_none());
    }

    #[test]
    fn test_yaml_roundtrip_of_defaults() {
        let yaml = Config::default().to_yaml().expect("serializable");
        assert!(yaml.contains("cooldown-seconds: 180"));
        let parsed: Config = serde_yaml::from_str(&yaml).expect("parsable");
        assert_eq!(parsed.bot.name, "mars-bot");
    }

    #[test]
    fn test_blank_api_key_is_missing() {
        let mut config = Config::default();
        config.nasa.api_key = Some("  ".to_string());
        assert!(config.nasa_api_key().is_err());
    }
}
