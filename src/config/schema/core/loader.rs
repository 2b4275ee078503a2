use super::Config;
use super::types::default_config_dir;
use crate::config::SubscriberBackend;
use crate::error::ConfigError;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

impl Config {
    /// Build the runtime config: TOML file (explicit path, else
    /// `~/.polka-bot/config.toml` when present), then environment overrides,
    /// then validation.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = match explicit_path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = default_config_dir().join("config.toml");
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(ConfigError::Io)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: Config = toml::from_str(&contents)
            .map_err(|e| ConfigError::Load(e.to_string()))
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.config_path = path.to_path_buf();
        Ok(config)
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.telegram.bot_token.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Environment variable TELEGRAM_BOT_TOKEN is required.".into(),
            ));
        }
        if self.telegram.channel_id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "telegram.channel_id must not be empty".into(),
            ));
        }
        if self.telegram.request_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "telegram.request_timeout_secs must be greater than zero".into(),
            ));
        }
        if let Some(url) = self.telegram.webhook_url.as_deref()
            && !url.starts_with("https://")
        {
            return Err(ConfigError::Validation(format!(
                "telegram.webhook_url must be an https URL, got {url}"
            )));
        }
        if self.links.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "links.timeout_secs must be greater than zero".into(),
            ));
        }
        if self.links.max_links_per_message == 0 {
            return Err(ConfigError::Validation(
                "links.max_links_per_message must be at least 1".into(),
            ));
        }
        if self.gateway.queue_capacity == 0 {
            return Err(ConfigError::Validation(
                "gateway.queue_capacity must be at least 1".into(),
            ));
        }
        if self.gateway.max_concurrent_updates == 0 {
            return Err(ConfigError::Validation(
                "gateway.max_concurrent_updates must be at least 1".into(),
            ));
        }
        if self.subscribers.backend == SubscriberBackend::File && self.subscribers.path.is_none() {
            return Err(ConfigError::Validation(
                "subscribers.path is required for the file backend".into(),
            ));
        }
        Ok(())
    }
}
