use crate::error::TelegramError;
use crate::links::{LinkProbe, Reachability, UnreachableReason};
use crate::telegram::{Messenger, SendMessage};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use url::Url;

/// Probe answering from a fixed table; unknown URLs time out.
#[derive(Default)]
pub struct StubProbe {
    answers: HashMap<String, Reachability>,
    delays: HashMap<String, Duration>,
}

impl StubProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reachable(mut self, url: &str) -> Self {
        self.answers
            .insert(normalize(url), Reachability::Reachable { status: 200 });
        self
    }

    pub fn status(mut self, url: &str, code: u16) -> Self {
        self.answers.insert(
            normalize(url),
            Reachability::Unreachable(UnreachableReason::Status(code)),
        );
        self
    }

    pub fn delayed(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(normalize(url), delay);
        self
    }
}

fn normalize(url: &str) -> String {
    Url::parse(url).map_or_else(|_| url.to_string(), |u| u.to_string())
}

impl LinkProbe for StubProbe {
    fn check<'a>(&'a self, url: &'a Url) -> Pin<Box<dyn Future<Output = Reachability> + Send + 'a>> {
        Box::pin(async move {
            if let Some(delay) = self.delays.get(url.as_str()) {
                tokio::time::sleep(*delay).await;
            }
            self.answers
                .get(url.as_str())
                .cloned()
                .unwrap_or(Reachability::Unreachable(UnreachableReason::Timeout))
        })
    }
}

/// Messenger that records every request; sends to `fail_chat` beyond the
/// first `fail_after` are rejected.
#[derive(Default)]
pub struct RecordingMessenger {
    sent: Mutex<Vec<SendMessage>>,
    fail_chat: Option<String>,
    fail_after: usize,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for(chat_id: &str) -> Self {
        Self::failing_after(chat_id, 0)
    }

    pub fn failing_after(chat_id: &str, successes: usize) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_chat: Some(chat_id.to_string()),
            fail_after: successes,
        }
    }

    pub fn sent(&self) -> Vec<SendMessage> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn sent_to(&self, chat_id: &str) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|m| m.chat_id == chat_id)
            .map(|m| m.text)
            .collect()
    }
}

impl Messenger for RecordingMessenger {
    fn send_message<'a>(
        &'a self,
        request: &'a SendMessage,
    ) -> Pin<Box<dyn Future<Output = Result<(), TelegramError>> + Send + 'a>> {
        Box::pin(async move {
            let earlier = {
                let mut sent = self.sent.lock().unwrap_or_else(PoisonError::into_inner);
                let earlier = sent.iter().filter(|m| m.chat_id == request.chat_id).count();
                sent.push(request.clone());
                earlier
            };
            if self.fail_chat.as_deref() == Some(request.chat_id.as_str())
                && earlier >= self.fail_after
            {
                return Err(TelegramError::Api {
                    method: "sendMessage".into(),
                    status: 403,
                    description: "Forbidden: bot is not a member of the channel chat".into(),
                });
            }
            Ok(())
        })
    }
}
