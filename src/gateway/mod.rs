//! Axum-based webhook receiver with body limits, request timeouts, and an
//! optional shared-secret check.
//!
//! Updates are acknowledged as soon as they are parsed; handling happens on a
//! worker fed through a bounded queue.

mod handlers;
mod worker;

use handlers::{handle_health, handle_root, handle_webhook};
pub use worker::run_update_worker;

use crate::bot::Bot;
use crate::config::Config;
use crate::links::HttpProbe;
use crate::subscribers::create_store;
use crate::telegram::{InboundUpdate, TelegramClient};
use anyhow::{Context, Result};
use axum::{
    Router,
    http::StatusCode,
    routing::{get, post},
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

/// Maximum request body size (64KB)
pub const MAX_BODY_SIZE: usize = 65_536;
/// Request timeout (30s)
pub const REQUEST_TIMEOUT_SECS: u64 = 30;
/// Header Telegram uses to echo the `secret_token` given to `setWebhook`
pub const SECRET_HEADER: &str = "X-Telegram-Bot-Api-Secret-Token";

/// Shared state for all axum handlers
#[derive(Clone)]
pub struct AppState {
    pub updates: mpsc::Sender<InboundUpdate>,
    pub webhook_secret: Option<Arc<str>>,
}

/// Build the gateway router around `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handle_root))
        .route("/health", get(handle_health))
        .route("/webhook", post(handle_webhook))
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        ))
}

/// Run the webhook gateway until Ctrl-C or SIGTERM.
pub async fn run_gateway(host: &str, port: u16, config: Config) -> Result<()> {
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("Invalid gateway address {host}:{port}"))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    run_gateway_with_listener(host, listener, config).await
}

/// Run the webhook gateway from a pre-bound listener until Ctrl-C or SIGTERM.
pub async fn run_gateway_with_listener(
    host: &str,
    listener: tokio::net::TcpListener,
    config: Config,
) -> Result<()> {
    run_gateway_until(host, listener, config, shutdown_signal()).await
}

/// Run the webhook gateway until `shutdown` resolves.
///
/// Registers the webhook first when `telegram.webhook_url` is set and removes
/// the registration again once the server has drained.
pub async fn run_gateway_until<F>(
    host: &str,
    listener: tokio::net::TcpListener,
    config: Config,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let actual_port = listener.local_addr()?.port();
    let display_addr = format!("{host}:{actual_port}");

    let client = Arc::new(
        TelegramClient::from_config(&config.telegram)
            .context("Failed to build Telegram client")?,
    );
    let store = create_store(&config.subscribers)
        .await
        .context("Failed to open subscriber store")?;
    let probe = Arc::new(HttpProbe::new(&config.links).context("Failed to build link checker")?);
    let bot = Arc::new(Bot::new(&config, store, client.clone(), probe));

    let registered = register_webhook(&client, &config).await;

    let (tx, rx) = mpsc::channel(config.gateway.queue_capacity);
    let worker = tokio::spawn(run_update_worker(
        rx,
        bot,
        config.gateway.max_concurrent_updates,
    ));

    let state = AppState {
        updates: tx,
        webhook_secret: config
            .telegram
            .webhook_secret
            .as_deref()
            .map(Arc::from),
    };

    tracing::info!(
        addr = %display_addr,
        channel = %config.telegram.channel_id,
        secret = state.webhook_secret.is_some(),
        "gateway listening (POST /webhook, GET /health)"
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("gateway stopped, draining queued updates");
    if tokio::time::timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS), worker)
        .await
        .is_err()
    {
        tracing::warn!("update worker did not finish in time");
    }

    if registered {
        match client.delete_webhook().await {
            Ok(()) => tracing::info!("webhook registration removed"),
            Err(e) => tracing::warn!(error = %e, "failed to remove webhook registration"),
        }
    }

    Ok(())
}

/// Register `telegram.webhook_url` with Telegram. Failures are logged and the
/// gateway keeps serving. Returns whether a registration was made.
async fn register_webhook(client: &TelegramClient, config: &Config) -> bool {
    let Some(url) = config.telegram.webhook_url.as_deref() else {
        tracing::info!("no webhook URL configured, skipping registration");
        return false;
    };

    match client
        .set_webhook(url, config.telegram.webhook_secret.as_deref())
        .await
    {
        Ok(()) => {
            tracing::info!(url, "webhook registered");
            true
        }
        Err(e) => {
            tracing::error!(url, error = %e, "failed to register webhook");
            false
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl-C, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
