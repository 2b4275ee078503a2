use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Gateway port (default: 8080)
    #[serde(default = "default_gateway_port")]
    pub port: u16,
    /// Gateway host (default: 0.0.0.0, Telegram must be able to reach it)
    #[serde(default = "default_gateway_host")]
    pub host: String,
    /// Updates buffered between the webhook and the dispatcher (default: 256)
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// Updates handled at the same time; the queue absorbs the rest (default: 16)
    #[serde(default = "default_max_concurrent_updates")]
    pub max_concurrent_updates: usize,
}

fn default_gateway_port() -> u16 {
    8080
}

fn default_gateway_host() -> String {
    "0.0.0.0".into()
}

fn default_queue_capacity() -> usize {
    256
}

fn default_max_concurrent_updates() -> usize {
    16
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_gateway_port(),
            host: default_gateway_host(),
            queue_capacity: default_queue_capacity(),
            max_concurrent_updates: default_max_concurrent_updates(),
        }
    }
}
