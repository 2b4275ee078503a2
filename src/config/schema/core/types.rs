use super::super::{GatewayConfig, LinkConfig, SubscriberConfig, TelegramConfig};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to config.toml - computed from home or `--config`, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub telegram: TelegramConfig,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub links: LinkConfig,

    #[serde(default)]
    pub subscribers: SubscriberConfig,
}

/// `~/.polka-bot`, or `./.polka-bot` when no home directory can be resolved.
pub(super) fn default_config_dir() -> PathBuf {
    let home = UserDirs::new().map_or_else(|| PathBuf::from("."), |u| u.home_dir().to_path_buf());
    home.join(".polka-bot")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: default_config_dir().join("config.toml"),
            telegram: TelegramConfig::default(),
            gateway: GatewayConfig::default(),
            links: LinkConfig::default(),
            subscribers: SubscriberConfig::default(),
        }
    }
}
