pub mod file;
pub mod memory;
pub mod traits;

pub use file::FileSubscriberStore;
pub use memory::MemorySubscriberStore;
pub use traits::{SenderId, SubscriberStore};

use crate::config::{SubscriberBackend, SubscriberConfig};
use anyhow::Context;
use std::sync::Arc;

pub async fn create_store(config: &SubscriberConfig) -> anyhow::Result<Arc<dyn SubscriberStore>> {
    let store: Arc<dyn SubscriberStore> = match config.backend {
        SubscriberBackend::Memory => Arc::new(MemorySubscriberStore::new()),
        SubscriberBackend::File => {
            let path = config
                .path
                .as_deref()
                .context("subscribers.path is required for the file backend")?;
            Arc::new(FileSubscriberStore::open(path).await?)
        }
    };
    match store.opted_out_count().await {
        Ok(opted_out) => tracing::info!(backend = store.name(), opted_out, "subscriber store ready"),
        Err(e) => tracing::warn!(
            backend = store.name(),
            error = %e,
            "subscriber store ready, opt-out count unavailable"
        ),
    }
    Ok(store)
}
