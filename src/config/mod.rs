pub mod schema;

pub use schema::{
    Config, GatewayConfig, LinkConfig, SubscriberBackend, SubscriberConfig, TelegramConfig,
};
