use super::types::{LinkConfig, Reachability, UnreachableReason};
use crate::security::{BlockedHost, ensure_public_url, is_private_url};
use anyhow::Result;
use reqwest::redirect::{Attempt, Policy};
use reqwest::{Method, StatusCode};
use std::error::Error as _;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use url::Url;

/// Existence check for a single URL.
pub trait LinkProbe: Send + Sync {
    fn check<'a>(&'a self, url: &'a Url) -> Pin<Box<dyn Future<Output = Reachability> + Send + 'a>>;
}

/// Lightweight HTTP probe: `HEAD` with a bounded timeout, falling back to a
/// headers-only `GET` when the server refuses `HEAD`.
///
/// Unless `allow_private_hosts` is set, links and redirect targets on
/// internal addresses are never contacted.
pub struct HttpProbe {
    client: reqwest::Client,
    allow_private_hosts: bool,
}

impl HttpProbe {
    pub fn new(config: &LinkConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .redirect(redirect_policy(
                config.max_redirects,
                config.allow_private_hosts,
            ))
            .build()?;
        Ok(Self {
            client,
            allow_private_hosts: config.allow_private_hosts,
        })
    }

    async fn probe(&self, url: &Url) -> Reachability {
        if !self.allow_private_hosts
            && let Err(blocked) = ensure_public_url(url).await
        {
            tracing::warn!(url = %url, reason = %blocked, "refusing to check internal link");
            return Reachability::Unreachable(UnreachableReason::Blocked);
        }

        let status = match self.status_of(Method::HEAD, url).await {
            Ok(status) if refuses_head(status) => {
                tracing::debug!(url = %url, %status, "HEAD refused, retrying with GET");
                self.status_of(Method::GET, url).await
            }
            other => other,
        };

        match status {
            Ok(status) => classify_status(status),
            Err(e) => {
                let reason = classify_error(&e);
                tracing::debug!(url = %url, error = %e, "link check failed");
                Reachability::Unreachable(reason)
            }
        }
    }

    async fn status_of(&self, method: Method, url: &Url) -> reqwest::Result<StatusCode> {
        // Dropping the response leaves any body unread.
        let response = self.client.request(method, url.as_str()).send().await?;
        Ok(response.status())
    }
}

impl LinkProbe for HttpProbe {
    fn check<'a>(&'a self, url: &'a Url) -> Pin<Box<dyn Future<Output = Reachability> + Send + 'a>> {
        Box::pin(self.probe(url))
    }
}

fn redirect_policy(max_redirects: usize, allow_private_hosts: bool) -> Policy {
    Policy::custom(move |attempt: Attempt<'_>| {
        if attempt.previous().len() > max_redirects {
            attempt.error("too many redirects")
        } else if !allow_private_hosts && is_private_url(attempt.url()) {
            let blocked = BlockedHost {
                host: attempt.url().host_str().unwrap_or_default().to_string(),
                addr: None,
            };
            attempt.error(blocked)
        } else {
            attempt.follow()
        }
    })
}

fn refuses_head(status: StatusCode) -> bool {
    status == StatusCode::METHOD_NOT_ALLOWED || status == StatusCode::NOT_IMPLEMENTED
}

fn classify_status(status: StatusCode) -> Reachability {
    if status.as_u16() < 400 {
        Reachability::Reachable {
            status: status.as_u16(),
        }
    } else {
        Reachability::Unreachable(UnreachableReason::Status(status.as_u16()))
    }
}

fn classify_error(error: &reqwest::Error) -> UnreachableReason {
    if redirected_to_internal_host(error) {
        UnreachableReason::Blocked
    } else if error.is_timeout() {
        UnreachableReason::Timeout
    } else if error.is_connect() {
        UnreachableReason::Connect(error.to_string())
    } else if let Some(status) = error.status() {
        UnreachableReason::Status(status.as_u16())
    } else {
        UnreachableReason::Request(error.to_string())
    }
}

fn redirected_to_internal_host(error: &reqwest::Error) -> bool {
    let mut source = error.source();
    while let Some(cause) = source {
        if cause.is::<BlockedHost>() {
            return true;
        }
        source = cause.source();
    }
    false
}
