use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Inbound (webhook payloads) ──────────────────────────────────────────────

/// Subset of the Bot API `Update` object this service reads.
///
/// Unknown fields (callback queries, channel posts, ...) are accepted and
/// ignored; only `update_id` is mandatory.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    #[serde(default)]
    pub from: Option<User>,
    pub chat: Chat,
    /// Unix timestamp
    pub date: i64,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// One received webhook event, normalized for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundUpdate {
    pub update_id: i64,
    pub message_id: i64,
    /// Chat replies are delivered to
    pub chat_id: i64,
    /// User who sent the message; the chat id when Telegram omits `from`
    pub sender_id: i64,
    pub sender_username: Option<String>,
    pub text: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl InboundUpdate {
    /// Normalize an update. Returns `None` for updates that carry no message.
    pub fn from_update(update: Update) -> Option<Self> {
        let message = update.message?;
        let sender_id = message.from.as_ref().map_or(message.chat.id, |u| u.id);
        Some(Self {
            update_id: update.update_id,
            message_id: message.message_id,
            chat_id: message.chat.id,
            sender_id,
            sender_username: message.from.and_then(|u| u.username),
            text: message.text,
            timestamp: DateTime::from_timestamp(message.date, 0).unwrap_or_else(Utc::now),
        })
    }

    /// Message text with surrounding whitespace removed; `None` when empty.
    pub fn trimmed_text(&self) -> Option<&str> {
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

// ─── Outbound (Bot API requests/responses) ───────────────────────────────────

/// `sendMessage` parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendMessage {
    /// Numeric chat id or `@channelusername`
    pub chat_id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_parameters: Option<ReplyParameters>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplyParameters {
    pub message_id: i64,
    pub allow_sending_without_reply: bool,
}

impl SendMessage {
    /// Plain post, e.g. to the destination channel.
    pub fn to_chat(chat_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            text: text.into(),
            reply_parameters: None,
        }
    }

    /// Reply threaded under the user's message.
    pub fn reply_to(update: &InboundUpdate, text: impl Into<String>) -> Self {
        Self {
            chat_id: update.chat_id.to_string(),
            text: text.into(),
            reply_parameters: Some(ReplyParameters {
                message_id: update.message_id,
                allow_sending_without_reply: true,
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(super) struct SetWebhook<'a> {
    pub url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_token: Option<&'a str>,
    pub allowed_updates: &'a [&'a str],
    pub drop_pending_updates: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookInfo {
    pub url: String,
    #[serde(default)]
    pub pending_update_count: i64,
    #[serde(default)]
    pub last_error_date: Option<i64>,
    #[serde(default)]
    pub last_error_message: Option<String>,
}

/// Bot API response envelope.
#[derive(Debug, Deserialize)]
pub(super) struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    #[serde(default)]
    pub description: Option<String>,
}
