use super::support::{
    CHANNEL, GatewayTestServer, calls, message_update, sent_to, telegram_api, test_config,
    wait_for_messages,
};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn link_target() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/article"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    server
}

async fn post_update(server: &GatewayTestServer, body: &Value) -> (StatusCode, Value) {
    let response = reqwest::Client::new()
        .post(server.url("/webhook"))
        .json(body)
        .send()
        .await
        .expect("webhook request should complete");
    let status = response.status();
    (status, response.json().await.expect("response should be json"))
}

#[tokio::test]
async fn reachable_link_is_published_to_channel() {
    let api = telegram_api().await;
    let target = link_target().await;
    let server = GatewayTestServer::start(test_config(&api)).await;

    let link = format!("{}/article", target.uri());
    let (status, body) =
        post_update(&server, &message_update(1, 555, &format!("check this out {link}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let sent = wait_for_messages(&api, 2).await;
    assert_eq!(sent_to(&sent, CHANNEL), vec![link]);
    let replies = sent_to(&sent, "555");
    assert_eq!(replies, vec!["This link seems valid and was posted!"]);
}

#[tokio::test]
async fn unreachable_link_is_not_published() {
    let api = telegram_api().await;
    let target = link_target().await;
    let server = GatewayTestServer::start(test_config(&api)).await;

    let link = format!("{}/missing", target.uri());
    post_update(&server, &message_update(2, 555, &link)).await;

    let sent = wait_for_messages(&api, 1).await;
    assert!(sent_to(&sent, CHANNEL).is_empty());
    assert_eq!(
        sent_to(&sent, "555"),
        vec!["That link returned status code 404, so it might be invalid."]
    );
}

#[tokio::test]
async fn internal_link_is_refused_when_private_hosts_are_blocked() {
    let api = telegram_api().await;
    let target = link_target().await;
    let mut config = test_config(&api);
    config.links.allow_private_hosts = false;
    let server = GatewayTestServer::start(config).await;

    let link = format!("{}/article", target.uri());
    post_update(&server, &message_update(6, 555, &link)).await;

    let sent = wait_for_messages(&api, 1).await;
    assert!(sent_to(&sent, CHANNEL).is_empty());
    assert_eq!(
        sent_to(&sent, "555"),
        vec!["That link points to a private network address, so it might be invalid."]
    );
    assert!(target.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn stop_then_link_is_ignored() {
    let api = telegram_api().await;
    let target = link_target().await;
    let server = GatewayTestServer::start(test_config(&api)).await;

    post_update(&server, &message_update(3, 777, "/stop")).await;
    wait_for_messages(&api, 1).await;

    let link = format!("{}/article", target.uri());
    post_update(&server, &message_update(4, 777, &link)).await;
    post_update(&server, &message_update(5, 777, "/help")).await;

    wait_for_messages(&api, 2).await;
    // Leave room for a stray publish before asserting on its absence.
    tokio::time::sleep(Duration::from_millis(300)).await;
    let sent = calls(&api, "sendMessage").await;
    assert!(sent_to(&sent, CHANNEL).is_empty());
    assert_eq!(sent_to(&sent, "777").len(), 2);
}

#[tokio::test]
async fn malformed_payloads_are_acknowledged() {
    let api = telegram_api().await;
    let server = GatewayTestServer::start(test_config(&api)).await;
    let client = reqwest::Client::new();

    for payload in ["not json", "{}", r#"{"not": "an update"}"#] {
        let response = client
            .post(server.url("/webhook"))
            .header("content-type", "application/json")
            .body(payload)
            .send()
            .await
            .expect("webhook request should complete");
        assert_eq!(response.status(), StatusCode::OK, "payload: {payload}");
        let body: Value = response.json().await.expect("response should be json");
        assert_eq!(body["status"], "error", "payload: {payload}");
    }

    let callback = serde_json::json!({"update_id": 9, "callback_query": {"id": "q", "data": "x"}});
    let (status, body) = post_update(&server, &callback).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(calls(&api, "sendMessage").await.is_empty());
}

#[tokio::test]
async fn webhook_secret_is_enforced() {
    let api = telegram_api().await;
    let mut config = test_config(&api);
    config.telegram.webhook_secret = Some("s3cret".to_string());
    let server = GatewayTestServer::start(config).await;
    let client = reqwest::Client::new();

    let denied = client
        .post(server.url("/webhook"))
        .json(&message_update(1, 555, "/help"))
        .send()
        .await
        .expect("request should complete");
    assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);

    let allowed = client
        .post(server.url("/webhook"))
        .header("X-Telegram-Bot-Api-Secret-Token", "s3cret")
        .json(&message_update(2, 555, "/help"))
        .send()
        .await
        .expect("request should complete");
    assert_eq!(allowed.status(), StatusCode::OK);

    let sent = wait_for_messages(&api, 1).await;
    assert_eq!(sent.len(), 1);
    assert!(sent[0]["text"].as_str().unwrap().contains("/help"));
}

#[tokio::test]
async fn root_and_health_report_liveness() {
    let api = telegram_api().await;
    let server = GatewayTestServer::start(test_config(&api)).await;

    let root: Value = reqwest::get(server.url("/"))
        .await
        .expect("root request should complete")
        .json()
        .await
        .expect("root should be json");
    assert_eq!(root["status"], "Polka Bot is running!");

    let health: Value = reqwest::get(server.url("/health"))
        .await
        .expect("health request should complete")
        .json()
        .await
        .expect("health should be json");
    assert_eq!(health["status"], "ok");
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let api = telegram_api().await;
    let server = GatewayTestServer::start(test_config(&api)).await;

    let response = reqwest::Client::new()
        .post(server.url("/webhook"))
        .body(vec![b'a'; 70_000])
        .send()
        .await
        .expect("request should complete");
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
