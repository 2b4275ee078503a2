use super::Config;
use crate::config::SubscriberBackend;
use std::path::PathBuf;

impl Config {
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup; empty values are ignored.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(token) = get("TELEGRAM_BOT_TOKEN") {
            self.telegram.bot_token = token;
        }

        if let Some(url) = get("TELEGRAM_WEBHOOK_URL") {
            self.telegram.webhook_url = Some(url);
        }

        if let Some(channel) = get("TELEGRAM_CHANNEL_ID") {
            self.telegram.channel_id = channel;
        }

        if let Some(admin) = get("ADMIN_CHAT_ID") {
            self.telegram.admin_chat_id = Some(admin);
        }

        if let Some(secret) = get("TELEGRAM_WEBHOOK_SECRET") {
            self.telegram.webhook_secret = Some(secret);
        }

        if let Some(base) = get("TELEGRAM_API_BASE") {
            self.telegram.api_base = base.trim_end_matches('/').to_string();
        }

        if let Some(host) = get("POLKA_GATEWAY_HOST").or_else(|| get("HOST")) {
            self.gateway.host = host;
        }

        if let Some(port_str) = get("POLKA_GATEWAY_PORT").or_else(|| get("PORT"))
            && let Ok(port) = port_str.trim().parse::<u16>()
        {
            self.gateway.port = port;
        }

        if let Some(timeout_str) = get("POLKA_LINK_TIMEOUT_SECS")
            && let Ok(timeout) = timeout_str.trim().parse::<u64>()
            && timeout > 0
        {
            self.links.timeout_secs = timeout;
        }

        if let Some(path) = get("POLKA_SUBSCRIBERS_PATH") {
            self.subscribers.backend = SubscriberBackend::File;
            self.subscribers.path = Some(PathBuf::from(path));
        }
    }
}
