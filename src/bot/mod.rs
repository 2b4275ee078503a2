//! Update dispatcher: routes every text message to the command router or the
//! URL pipeline, sends the reply, and alerts the administrator on failures.

use crate::commands::{Command, CommandRouter, parse_command};
use crate::config::Config;
use crate::links::{LinkProbe, Reachability};
use crate::pipeline::{PipelineReport, UrlPipeline};
use crate::subscribers::SubscriberStore;
use crate::telegram::{InboundUpdate, Messenger, SendMessage};
use crate::utils::log_preview;
use std::fmt::Write as _;
use std::sync::Arc;


pub const NO_LINK_TEXT: &str = "Send me a valid link or type /help for commands.";
pub const PUBLISHED_TEXT: &str = "This link seems valid and was posted!";
pub const PUBLISH_FAILED_TEXT: &str =
    "I couldn't post that link to the channel. Please try again later.";

/// How an update was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Update carried no text
    Empty,
    Command(Command),
    /// Sender has opted out; nothing was sent
    Ignored,
    Links {
        published: usize,
        unreachable: usize,
        publish_failed: bool,
    },
}

pub struct Bot {
    commands: CommandRouter,
    pipeline: UrlPipeline,
    store: Arc<dyn SubscriberStore>,
    messenger: Arc<dyn Messenger>,
    admin_chat_id: Option<String>,
    confirm_publish: bool,
}

impl Bot {
    pub fn new(
        config: &Config,
        store: Arc<dyn SubscriberStore>,
        messenger: Arc<dyn Messenger>,
        probe: Arc<dyn LinkProbe>,
    ) -> Self {
        let pipeline = UrlPipeline::new(
            probe,
            Arc::clone(&messenger),
            config.telegram.channel_id.as_str(),
            config.links.max_links_per_message,
        );
        Self {
            commands: CommandRouter::new(Arc::clone(&store)),
            pipeline,
            store,
            messenger,
            admin_chat_id: config
                .telegram
                .admin_chat_id
                .clone()
                .filter(|id| !id.trim().is_empty()),
            confirm_publish: config.links.confirm_publish,
        }
    }

    /// Handle one update end to end. Never fails; problems are logged and,
    /// where useful, reported to the sender or the administrator.
    pub async fn handle_update(&self, update: &InboundUpdate) -> DispatchOutcome {
        let Some(text) = update.trimmed_text() else {
            tracing::debug!(update_id = update.update_id, "update without text, skipping");
            return DispatchOutcome::Empty;
        };

        if let Some(command) = parse_command(text) {
            tracing::info!(
                update_id = update.update_id,
                sender = update.sender_id,
                ?command,
                "handling command"
            );
            let reply = self.commands.handle(&command, update.sender_id).await;
            self.reply(update, reply).await;
            return DispatchOutcome::Command(command);
        }

        match self.store.is_opted_out(update.sender_id).await {
            Ok(true) => {
                tracing::debug!(sender = update.sender_id, "sender opted out, ignoring message");
                return DispatchOutcome::Ignored;
            }
            Ok(false) => {}
            Err(e) => {
                // An unreadable store counts as subscribed.
                tracing::warn!(sender = update.sender_id, error = %e, "opt-out lookup failed");
            }
        }

        tracing::info!(
            update_id = update.update_id,
            sender = update.sender_id,
            text = %log_preview(text),
            "checking submitted links"
        );
        let report = self.pipeline.run(text).await;
        self.finish_links(update, &report).await;

        DispatchOutcome::Links {
            published: report.published.len(),
            unreachable: report.unreachable().count(),
            publish_failed: report.publish_failure.is_some(),
        }
    }

    async fn finish_links(&self, update: &InboundUpdate, report: &PipelineReport) {
        if let Some(failure) = &report.publish_failure {
            self.reply(update, publish_failed_text(report, &failure.candidate.raw))
                .await;
            self.notify_admin(format!(
                "Failed to publish {} to {}: {}",
                failure.candidate.raw,
                self.pipeline.channel_id(),
                failure.error
            ))
            .await;
            return;
        }

        if !report.found_links() {
            self.reply(update, NO_LINK_TEXT).await;
        } else if report.published.is_empty() {
            self.reply(update, unreachable_text(report)).await;
        } else if self.confirm_publish {
            self.reply(update, published_text(report)).await;
        }
    }

    async fn reply(&self, update: &InboundUpdate, text: impl Into<String>) {
        let request = SendMessage::reply_to(update, text);
        if let Err(e) = self.messenger.send_message(&request).await {
            tracing::warn!(chat_id = update.chat_id, error = %e, "failed to send reply");
        }
    }

    /// Best-effort alert to the administrator chat.
    async fn notify_admin(&self, text: String) {
        let Some(admin) = &self.admin_chat_id else {
            return;
        };
        let request = SendMessage::to_chat(admin.as_str(), text);
        if let Err(e) = self.messenger.send_message(&request).await {
            tracing::warn!(admin_chat_id = %admin, error = %e, "failed to notify admin");
        }
    }
}

fn unreachable_text(report: &PipelineReport) -> String {
    let unreachable: Vec<_> = report.unreachable().collect();
    let mut text = if let [check] = unreachable.as_slice()
        && let Reachability::Unreachable(reason) = &check.reachability
    {
        format!("That link {reason}, so it might be invalid.")
    } else {
        let mut text = String::from("None of those links could be reached:");
        for check in &unreachable {
            if let Reachability::Unreachable(reason) = &check.reachability {
                let _ = write!(text, "\n{} {reason}", check.candidate.raw);
            }
        }
        text
    };
    push_skipped_note(&mut text, report.skipped);
    text
}

fn published_text(report: &PipelineReport) -> String {
    let mut text = match report.published.len() {
        1 => PUBLISHED_TEXT.to_string(),
        n => format!("{n} links seem valid and were posted!"),
    };
    for check in report.unreachable() {
        if let Reachability::Unreachable(reason) = &check.reachability {
            let _ = write!(text, "\nSkipped {}: {reason}", check.candidate.raw);
        }
    }
    push_skipped_note(&mut text, report.skipped);
    text
}

fn publish_failed_text(report: &PipelineReport, failed: &str) -> String {
    if report.published.is_empty() {
        return PUBLISH_FAILED_TEXT.to_string();
    }

    let mut text = String::from("Posted to the channel:");
    for candidate in &report.published {
        let _ = write!(text, "\n{}", candidate.raw);
    }
    let _ = write!(
        text,
        "\nBut I couldn't post {failed} or anything after it. Please try again later."
    );
    text
}

fn push_skipped_note(text: &mut String, skipped: usize) {
    match skipped {
        0 => {}
        1 => text.push_str("\n1 more link was ignored (too many links in one message)."),
        n => {
            let _ = write!(text, "\n{n} more links were ignored (too many links in one message).");
        }
    }
}
