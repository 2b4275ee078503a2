use polka_bot::config::Config;
use polka_bot::gateway::run_gateway_with_listener;
use reqwest::StatusCode;
use serde_json::{Value, json};
use std::time::Duration;
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "123:TEST";
pub const CHANNEL: &str = "@polka_links";

pub struct GatewayTestServer {
    port: u16,
    handle: tokio::task::JoinHandle<anyhow::Result<()>>,
}

impl GatewayTestServer {
    pub async fn start(config: Config) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("ephemeral gateway listener should bind");
        let port = listener
            .local_addr()
            .expect("ephemeral gateway listener should expose local address")
            .port();

        let handle = tokio::spawn(async move {
            run_gateway_with_listener("127.0.0.1", listener, config).await
        });

        wait_until_gateway_ready(port).await;

        Self { port, handle }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{path}", self.port)
    }
}

impl Drop for GatewayTestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub async fn wait_until_gateway_ready(port: u16) {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .expect("reqwest client should be built");

    for _ in 0..80 {
        let health = client
            .get(format!("http://127.0.0.1:{port}/health"))
            .send()
            .await;
        if matches!(health, Ok(resp) if resp.status() == StatusCode::OK) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    panic!("gateway did not become ready on port {port}");
}

/// Mock Bot API that accepts every method this service calls.
pub async fn telegram_api() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/bot[^/]+/sendMessage$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": {"message_id": 1}
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/bot[^/]+/(setWebhook|deleteWebhook)$"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": true})),
        )
        .mount(&server)
        .await;
    server
}

pub fn test_config(api: &MockServer) -> Config {
    let mut config = Config::default();
    config.telegram.bot_token = TOKEN.to_string();
    config.telegram.channel_id = CHANNEL.to_string();
    config.telegram.api_base = api.uri();
    config.telegram.request_timeout_secs = 2;
    config.links.timeout_secs = 2;
    // Link targets are wiremock servers on loopback.
    config.links.allow_private_hosts = true;
    config
}

pub fn message_update(update_id: i64, sender: i64, text: &str) -> Value {
    json!({
        "update_id": update_id,
        "message": {
            "message_id": update_id * 10,
            "from": {"id": sender, "is_bot": false, "first_name": "Tester"},
            "chat": {"id": sender, "type": "private"},
            "date": 1_700_000_000,
            "text": text
        }
    })
}

/// Bodies of every `bot_method` call received so far.
pub async fn calls(api: &MockServer, bot_method: &str) -> Vec<Value> {
    let suffix = format!("/{bot_method}");
    api.received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|request| request.url.path().ends_with(&suffix))
        .map(|request| serde_json::from_slice(&request.body).unwrap_or(Value::Null))
        .collect()
}

/// Poll until at least `count` `sendMessage` calls have arrived.
pub async fn wait_for_messages(api: &MockServer, count: usize) -> Vec<Value> {
    for _ in 0..200 {
        let sent = calls(api, "sendMessage").await;
        if sent.len() >= count {
            return sent;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("expected {count} sendMessage calls");
}

pub fn sent_to(messages: &[Value], chat_id: &str) -> Vec<String> {
    messages
        .iter()
        .filter(|m| m["chat_id"] == chat_id)
        .filter_map(|m| m["text"].as_str().map(ToOwned::to_owned))
        .collect()
}
