use serde::{Deserialize, Serialize};
use std::fmt;

/// Telegram Bot API settings: credentials, the destination channel, and the
/// webhook registration this service performs at startup.
#[derive(Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot access token issued by `@BotFather` (required)
    #[serde(default)]
    pub bot_token: String,
    /// Public channel that receives verified links (`@name` or numeric id)
    #[serde(default = "default_channel_id")]
    pub channel_id: String,
    /// Chat that receives failure notifications. None = no admin notifications.
    #[serde(default)]
    pub admin_chat_id: Option<String>,
    /// Public URL Telegram should deliver updates to. None = skip self-registration.
    #[serde(default)]
    pub webhook_url: Option<String>,
    /// Shared secret echoed by Telegram in `X-Telegram-Bot-Api-Secret-Token`
    #[serde(default)]
    pub webhook_secret: Option<String>,
    /// Bot API base URL (default: <https://api.telegram.org>)
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Timeout for outbound Bot API calls in seconds (default: 10)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_channel_id() -> String {
    "@your_public_channel".into()
}

fn default_api_base() -> String {
    "https://api.telegram.org".into()
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            channel_id: default_channel_id(),
            admin_chat_id: None,
            webhook_url: None,
            webhook_secret: None,
            api_base: default_api_base(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

// Keep the token and webhook secret out of logs.
impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &redact(&self.bot_token))
            .field("channel_id", &self.channel_id)
            .field("admin_chat_id", &self.admin_chat_id)
            .field("webhook_url", &self.webhook_url)
            .field(
                "webhook_secret",
                &self.webhook_secret.as_deref().map(redact),
            )
            .field("api_base", &self.api_base)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() { "<unset>" } else { "<redacted>" }
}
