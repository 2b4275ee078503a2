use crate::cli::commands::{Cli, Commands, WebhookCommands};
use anyhow::{Context, Result, bail};
use polka_bot::Config;
use polka_bot::telegram::TelegramClient;
use tracing::info;

pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Serve { port, host } => {
            let port = port.unwrap_or(config.gateway.port);
            let host = host.unwrap_or_else(|| config.gateway.host.clone());
            if port == 0 {
                info!("Starting Polka Bot gateway on {host} (random port)");
            } else {
                info!("Starting Polka Bot gateway on {host}:{port}");
            }
            polka_bot::gateway::run_gateway(&host, port, config).await
        }

        Commands::Webhook { webhook_command } => handle_webhook_command(webhook_command, &config).await,
    }
}

async fn handle_webhook_command(command: WebhookCommands, config: &Config) -> Result<()> {
    let client = TelegramClient::from_config(&config.telegram)?;

    match command {
        WebhookCommands::Set { url } => {
            let Some(url) = url.or_else(|| config.telegram.webhook_url.clone()) else {
                bail!("No webhook URL given. Pass one or set TELEGRAM_WEBHOOK_URL.");
            };
            if !url.starts_with("https://") {
                bail!("Webhook URL must use https: {url}");
            }
            client
                .set_webhook(&url, config.telegram.webhook_secret.as_deref())
                .await
                .context("setWebhook failed")?;
            println!("✓ Webhook registered: {url}");
        }
        WebhookCommands::Delete => {
            client
                .delete_webhook()
                .await
                .context("deleteWebhook failed")?;
            println!("✓ Webhook removed");
        }
        WebhookCommands::Info => {
            let me = client.get_me().await.context("getMe failed")?;
            let info = client
                .webhook_info()
                .await
                .context("getWebhookInfo failed")?;
            println!(
                "Bot:      @{}",
                me.username.as_deref().unwrap_or("(no username)")
            );
            if info.url.is_empty() {
                println!("Webhook:  (not registered)");
            } else {
                println!("Webhook:  {}", info.url);
            }
            println!("Pending:  {}", info.pending_update_count);
            if let Some(error) = info.last_error_message {
                println!("Last error: {error}");
            }
        }
    }

    Ok(())
}
