mod core;
mod gateway;
mod subscribers;
mod telegram;

pub use self::core::Config;
pub use crate::links::types::LinkConfig;
pub use gateway::GatewayConfig;
pub use subscribers::{SubscriberBackend, SubscriberConfig};
pub use telegram::TelegramConfig;
