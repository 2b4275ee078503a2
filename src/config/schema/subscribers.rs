use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubscriberBackend {
    /// Opt-outs live for the lifetime of the process
    #[default]
    Memory,
    /// Opt-outs are persisted to a JSON file and survive restarts
    File,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubscriberConfig {
    #[serde(default)]
    pub backend: SubscriberBackend,
    /// JSON file for the `file` backend
    #[serde(default)]
    pub path: Option<PathBuf>,
}
