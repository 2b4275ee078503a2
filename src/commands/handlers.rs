use super::types::Command;
use crate::subscribers::{SenderId, SubscriberStore};
use std::sync::Arc;

pub const WELCOME_TEXT: &str = "Welcome to Polka Bot! Use /help to see available commands.";

pub const HELP_TEXT: &str = "Commands:\n\
    /start - Start the bot and see a welcome message\n\
    /help - View this help message\n\
    /stop - Stop the bot from handling your messages\n\
    \n\
    Send me a URL and I'll try to validate it!";

pub const STOP_TEXT: &str =
    "You have been unsubscribed. I will ignore your links until you send /start.";

pub const SAVE_FAILED_TEXT: &str =
    "Sorry, I couldn't save your preference. Please try again later.";

/// Answers commands and applies their effect on the subscriber store.
pub struct CommandRouter {
    store: Arc<dyn SubscriberStore>,
}

impl CommandRouter {
    pub fn new(store: Arc<dyn SubscriberStore>) -> Self {
        Self { store }
    }

    /// Handle `command` for `sender`, returning the reply text.
    pub async fn handle(&self, command: &Command, sender: SenderId) -> String {
        match command {
            Command::Start => self.handle_start(sender).await,
            Command::Help => HELP_TEXT.to_string(),
            Command::Stop => self.handle_stop(sender).await,
            Command::Unknown(name) => unknown_command_text(name),
        }
    }

    async fn handle_start(&self, sender: SenderId) -> String {
        match self.store.opt_in(sender).await {
            Ok(resubscribed) => {
                if resubscribed {
                    tracing::info!(sender, "sender subscribed again");
                }
                WELCOME_TEXT.to_string()
            }
            Err(e) => {
                tracing::error!(sender, error = %e, "failed to clear opt-out");
                SAVE_FAILED_TEXT.to_string()
            }
        }
    }

    async fn handle_stop(&self, sender: SenderId) -> String {
        match self.store.opt_out(sender).await {
            Ok(newly) => {
                tracing::info!(sender, newly, "sender opted out");
                STOP_TEXT.to_string()
            }
            Err(e) => {
                tracing::error!(sender, error = %e, "failed to record opt-out");
                SAVE_FAILED_TEXT.to_string()
            }
        }
    }
}

fn unknown_command_text(name: &str) -> String {
    if name.is_empty() {
        "That isn't a command I know. Type /help for commands.".to_string()
    } else {
        format!("I don't know the command /{name}. Type /help for commands.")
    }
}
