use super::support::{calls, telegram_api, test_config, wait_until_gateway_ready};
use polka_bot::gateway::run_gateway_until;
use serde_json::json;
use std::time::Duration;
use tokio::sync::oneshot;

#[tokio::test]
async fn webhook_is_registered_and_removed_on_shutdown() {
    let api = telegram_api().await;
    let mut config = test_config(&api);
    config.telegram.webhook_url = Some("https://bot.example.com/webhook".to_string());
    config.telegram.webhook_secret = Some("s3cret".to_string());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("ephemeral gateway listener should bind");
    let port = listener
        .local_addr()
        .expect("listener should expose local address")
        .port();

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(async move {
        run_gateway_until("127.0.0.1", listener, config, async move {
            let _ = stop_rx.await;
        })
        .await
    });
    wait_until_gateway_ready(port).await;

    let registered = calls(&api, "setWebhook").await;
    assert_eq!(registered.len(), 1);
    assert_eq!(registered[0]["url"], "https://bot.example.com/webhook");
    assert_eq!(registered[0]["secret_token"], "s3cret");
    assert_eq!(registered[0]["allowed_updates"], json!(["message"]));
    assert!(calls(&api, "deleteWebhook").await.is_empty());

    stop_tx.send(()).expect("gateway should still be running");
    tokio::time::timeout(Duration::from_secs(10), handle)
        .await
        .expect("gateway should stop")
        .expect("gateway task should not panic")
        .expect("gateway should exit cleanly");

    assert_eq!(calls(&api, "deleteWebhook").await.len(), 1);
}

#[tokio::test]
async fn no_webhook_url_skips_registration() {
    let api = telegram_api().await;
    let config = test_config(&api);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("ephemeral gateway listener should bind");
    let port = listener
        .local_addr()
        .expect("listener should expose local address")
        .port();

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(async move {
        run_gateway_until("127.0.0.1", listener, config, async move {
            let _ = stop_rx.await;
        })
        .await
    });
    wait_until_gateway_ready(port).await;
    stop_tx.send(()).expect("gateway should still be running");
    tokio::time::timeout(Duration::from_secs(10), handle)
        .await
        .expect("gateway should stop")
        .expect("gateway task should not panic")
        .expect("gateway should exit cleanly");

    assert!(calls(&api, "setWebhook").await.is_empty());
    assert!(calls(&api, "deleteWebhook").await.is_empty());
}
