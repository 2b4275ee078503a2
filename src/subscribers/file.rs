use super::traits::{SenderId, StoreFuture, SubscriberStore};
use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

const FILE_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct SubscriberFile {
    version: u32,
    opted_out: Vec<SenderId>,
}

/// Opt-out list persisted as JSON, rewritten atomically on every change.
///
/// Mutations and the file write happen under one async lock, so the file
/// always reflects the last acknowledged change.
pub struct FileSubscriberStore {
    path: PathBuf,
    opted_out: Mutex<HashSet<SenderId>>,
}

impl FileSubscriberStore {
    /// Open the store, loading `path` if it exists. A missing file is an empty list.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let opted_out = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let file: SubscriberFile =
                    serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt {
                        path: path.display().to_string(),
                        message: e.to_string(),
                    })?;
                file.opted_out.into_iter().collect()
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashSet::new(),
            Err(e) => {
                return Err(StoreError::Read {
                    path: path.display().to_string(),
                    message: e.to_string(),
                });
            }
        };

        tracing::info!(
            path = %path.display(),
            opted_out = opted_out.len(),
            "subscriber store loaded"
        );

        Ok(Self {
            path,
            opted_out: Mutex::new(opted_out),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, opted_out: &HashSet<SenderId>) -> Result<(), StoreError> {
        let write_err = |e: &dyn std::fmt::Display| StoreError::Write {
            path: self.path.display().to_string(),
            message: e.to_string(),
        };

        let mut ids: Vec<SenderId> = opted_out.iter().copied().collect();
        ids.sort_unstable();
        let body = serde_json::to_vec_pretty(&SubscriberFile {
            version: FILE_VERSION,
            opted_out: ids,
        })
        .map_err(|e| write_err(&e))?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| write_err(&e))?;
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, body)
            .await
            .map_err(|e| write_err(&e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| write_err(&e))
    }

    async fn update(&self, sender: SenderId, opt_out: bool) -> Result<bool, StoreError> {
        let mut guard = self.opted_out.lock().await;
        if guard.contains(&sender) == opt_out {
            return Ok(false);
        }

        let mut next = guard.clone();
        if opt_out {
            next.insert(sender);
        } else {
            next.remove(&sender);
        }
        self.persist(&next).await?;
        *guard = next;
        Ok(true)
    }
}

impl SubscriberStore for FileSubscriberStore {
    fn name(&self) -> &str {
        "file"
    }

    fn is_opted_out(&self, sender: SenderId) -> StoreFuture<'_, bool> {
        Box::pin(async move { Ok(self.opted_out.lock().await.contains(&sender)) })
    }

    fn opt_out(&self, sender: SenderId) -> StoreFuture<'_, bool> {
        Box::pin(self.update(sender, true))
    }

    fn opt_in(&self, sender: SenderId) -> StoreFuture<'_, bool> {
        Box::pin(self.update(sender, false))
    }

    fn opted_out_count(&self) -> StoreFuture<'_, usize> {
        Box::pin(async move { Ok(self.opted_out.lock().await.len()) })
    }
}
