pub mod types;

pub use types::{InboundUpdate, ReplyParameters, SendMessage, Update, User, WebhookInfo};

use crate::config::TelegramConfig;
use crate::error::TelegramError;
use crate::utils::truncate_with_ellipsis;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use types::{ApiResponse, SetWebhook};


/// Outbound message seam used by the dispatcher and the publish pipeline.
pub trait Messenger: Send + Sync {
    fn send_message<'a>(
        &'a self,
        request: &'a SendMessage,
    ) -> Pin<Box<dyn Future<Output = Result<(), TelegramError>> + Send + 'a>>;
}

/// Telegram Bot API client (JSON over HTTPS)
pub struct TelegramClient {
    bot_token: String,
    api_base: String,
    client: reqwest::Client,
}

impl TelegramClient {
    pub fn new(bot_token: String, api_base: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            bot_token,
            api_base: api_base.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config(config: &TelegramConfig) -> anyhow::Result<Self> {
        Self::new(
            config.bot_token.clone(),
            &config.api_base,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.api_base, self.bot_token)
    }

    async fn call<P, R>(&self, method: &str, params: &P) -> Result<R, TelegramError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        // reqwest errors embed the request URL, which contains the token.
        let request_err = |e: reqwest::Error| TelegramError::Request {
            method: method.to_string(),
            message: e.without_url().to_string(),
        };

        let response = self
            .client
            .post(self.api_url(method))
            .json(params)
            .send()
            .await
            .map_err(request_err)?;
        let status = response.status();
        let body = response.text().await.map_err(request_err)?;

        let parsed: ApiResponse<R> = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                return Err(TelegramError::Api {
                    method: method.to_string(),
                    status: status.as_u16(),
                    description: truncate_with_ellipsis(&body, 200),
                });
            }
            Err(e) => {
                return Err(TelegramError::Decode {
                    method: method.to_string(),
                    message: e.to_string(),
                });
            }
        };

        if !status.is_success() || !parsed.ok {
            return Err(TelegramError::Api {
                method: method.to_string(),
                status: status.as_u16(),
                description: parsed
                    .description
                    .unwrap_or_else(|| "no description".to_string()),
            });
        }

        parsed.result.ok_or_else(|| TelegramError::Decode {
            method: method.to_string(),
            message: "response has no result".to_string(),
        })
    }

    /// Send a text message; the sent message object is discarded.
    pub async fn send(&self, request: &SendMessage) -> Result<(), TelegramError> {
        self.call::<_, serde_json::Value>("sendMessage", request)
            .await
            .map(|_| ())
    }

    /// Register `url` as the webhook. Only `message` updates are requested.
    pub async fn set_webhook(&self, url: &str, secret: Option<&str>) -> Result<(), TelegramError> {
        let params = SetWebhook {
            url,
            secret_token: secret,
            allowed_updates: &["message"],
            drop_pending_updates: false,
        };
        self.call::<_, bool>("setWebhook", &params).await.map(|_| ())
    }

    pub async fn delete_webhook(&self) -> Result<(), TelegramError> {
        self.call::<_, bool>("deleteWebhook", &serde_json::json!({}))
            .await
            .map(|_| ())
    }

    pub async fn webhook_info(&self) -> Result<WebhookInfo, TelegramError> {
        self.call("getWebhookInfo", &serde_json::json!({})).await
    }

    pub async fn get_me(&self) -> Result<User, TelegramError> {
        self.call("getMe", &serde_json::json!({})).await
    }
}

impl Messenger for TelegramClient {
    fn send_message<'a>(
        &'a self,
        request: &'a SendMessage,
    ) -> Pin<Box<dyn Future<Output = Result<(), TelegramError>> + Send + 'a>> {
        Box::pin(self.send(request))
    }
}
