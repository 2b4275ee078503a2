use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// A URL-shaped substring found in a message.
///
/// `raw` is exactly what the user wrote and is what gets published;
/// `url` is the parsed form used for the check and for de-duplication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkCandidate {
    pub raw: String,
    pub url: Url,
}

/// Result of checking one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkCheck {
    pub candidate: LinkCandidate,
    pub reachability: Reachability,
}

impl LinkCheck {
    pub fn is_reachable(&self) -> bool {
        self.reachability.is_reachable()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reachability {
    Reachable { status: u16 },
    Unreachable(UnreachableReason),
}

impl Reachability {
    pub fn is_reachable(&self) -> bool {
        matches!(self, Self::Reachable { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnreachableReason {
    Timeout,
    Connect(String),
    Status(u16),
    Request(String),
    /// Host is, or resolves to, a loopback, private, or metadata address
    Blocked,
}

impl fmt::Display for UnreachableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "timed out"),
            Self::Connect(_) => write!(f, "could not connect"),
            Self::Status(code) => write!(f, "returned status code {code}"),
            Self::Request(_) => write!(f, "request failed"),
            Self::Blocked => write!(f, "points to a private network address"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkConfig {
    /// Per-link check timeout in seconds (default: 5)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Candidates beyond this many per message are ignored (default: 5)
    #[serde(default = "default_max_links_per_message")]
    pub max_links_per_message: usize,
    /// Redirects followed during a check (default: 5)
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
    /// Reply to the sender after a successful publish (default: true)
    #[serde(default = "default_true")]
    pub confirm_publish: bool,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Check links on loopback and private networks (default: false)
    #[serde(default)]
    pub allow_private_hosts: bool,
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_max_links_per_message() -> usize {
    5
}

fn default_max_redirects() -> usize {
    5
}

fn default_true() -> bool {
    true
}

fn default_user_agent() -> String {
    concat!("PolkaBot/", env!("CARGO_PKG_VERSION")).into()
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_links_per_message: default_max_links_per_message(),
            max_redirects: default_max_redirects(),
            confirm_publish: true,
            user_agent: default_user_agent(),
            allow_private_hosts: false,
        }
    }
}
