//! URL validation and publication.
//!
//! Candidates are extracted from the message, checked concurrently, and the
//! reachable ones are published to the destination channel in the order the
//! user wrote them. Publishing starts only once every check has finished.

use crate::error::TelegramError;
use crate::links::{LinkCandidate, LinkCheck, LinkProbe, detect_urls};
use crate::telegram::{Messenger, SendMessage};
use futures_util::future::join_all;
use std::sync::Arc;


/// What happened to one message's links.
#[derive(Debug, Default)]
pub struct PipelineReport {
    /// Every checked candidate, in order of appearance
    pub checks: Vec<LinkCheck>,
    /// Candidates posted to the channel
    pub published: Vec<LinkCandidate>,
    /// Set when a publish call failed; later candidates were not attempted
    pub publish_failure: Option<PublishFailure>,
    /// Candidates dropped by the per-message cap
    pub skipped: usize,
}

#[derive(Debug)]
pub struct PublishFailure {
    pub candidate: LinkCandidate,
    pub error: TelegramError,
}

impl PipelineReport {
    pub fn found_links(&self) -> bool {
        !self.checks.is_empty()
    }

    pub fn unreachable(&self) -> impl Iterator<Item = &LinkCheck> {
        self.checks.iter().filter(|check| !check.is_reachable())
    }
}

pub struct UrlPipeline {
    probe: Arc<dyn LinkProbe>,
    messenger: Arc<dyn Messenger>,
    channel_id: String,
    max_links: usize,
}

impl UrlPipeline {
    pub fn new(
        probe: Arc<dyn LinkProbe>,
        messenger: Arc<dyn Messenger>,
        channel_id: impl Into<String>,
        max_links: usize,
    ) -> Self {
        Self {
            probe,
            messenger,
            channel_id: channel_id.into(),
            max_links,
        }
    }

    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    /// Extract, check and publish the links in `text`.
    pub async fn run(&self, text: &str) -> PipelineReport {
        let mut candidates = detect_urls(text);
        let skipped = candidates.len().saturating_sub(self.max_links);
        if skipped > 0 {
            tracing::info!(skipped, cap = self.max_links, "ignoring links over the cap");
            candidates.truncate(self.max_links);
        }

        let checks = self.check_all(candidates).await;
        let mut report = PipelineReport {
            checks,
            skipped,
            ..PipelineReport::default()
        };

        let reachable: Vec<LinkCandidate> = report
            .checks
            .iter()
            .filter(|check| check.is_reachable())
            .map(|check| check.candidate.clone())
            .collect();

        for candidate in reachable {
            let request = SendMessage::to_chat(self.channel_id.as_str(), candidate.raw.as_str());
            match self.messenger.send_message(&request).await {
                Ok(()) => {
                    tracing::info!(url = %candidate.raw, channel = %self.channel_id, "link published");
                    report.published.push(candidate);
                }
                Err(error) => {
                    tracing::error!(
                        url = %candidate.raw,
                        channel = %self.channel_id,
                        error = %error,
                        "failed to publish link"
                    );
                    report.publish_failure = Some(PublishFailure { candidate, error });
                    break;
                }
            }
        }

        report
    }

    async fn check_all(&self, candidates: Vec<LinkCandidate>) -> Vec<LinkCheck> {
        let probes = candidates.iter().map(|candidate| self.probe.check(&candidate.url));
        let results = join_all(probes).await;

        candidates
            .into_iter()
            .zip(results)
            .map(|(candidate, reachability)| {
                tracing::debug!(url = %candidate.raw, ?reachability, "link checked");
                LinkCheck {
                    candidate,
                    reachability,
                }
            })
            .collect()
    }
}
