use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// `polka-bot` - Telegram bot that verifies submitted links and posts them to a channel.
#[derive(Parser, Debug)]
#[command(name = "polka-bot")]
#[command(version)]
#[command(about = "Verifies submitted links and publishes them to a Telegram channel.", long_about = None)]
pub struct Cli {
    /// Path to config.toml (default: ~/.polka-bot/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the webhook gateway
    Serve {
        /// Port to listen on (use 0 for random available port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
    },

    /// Manage the Telegram webhook registration
    Webhook {
        #[command(subcommand)]
        webhook_command: WebhookCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum WebhookCommands {
    /// Register the webhook URL with Telegram
    Set {
        /// Public HTTPS URL (default: telegram.webhook_url)
        url: Option<String>,
    },
    /// Remove the webhook registration
    Delete,
    /// Show the current registration as Telegram sees it
    Info,
}
