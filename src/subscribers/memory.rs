use super::traits::{SenderId, StoreFuture, SubscriberStore};
use std::collections::HashSet;
use std::sync::{PoisonError, RwLock};

/// Process-lifetime opt-out list.
#[derive(Default)]
pub struct MemorySubscriberStore {
    opted_out: RwLock<HashSet<SenderId>>,
}

impl MemorySubscriberStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SubscriberStore for MemorySubscriberStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn is_opted_out(&self, sender: SenderId) -> StoreFuture<'_, bool> {
        let opted_out = self
            .opted_out
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&sender);
        Box::pin(async move { Ok(opted_out) })
    }

    fn opt_out(&self, sender: SenderId) -> StoreFuture<'_, bool> {
        let inserted = self
            .opted_out
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(sender);
        Box::pin(async move { Ok(inserted) })
    }

    fn opt_in(&self, sender: SenderId) -> StoreFuture<'_, bool> {
        let removed = self
            .opted_out
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&sender);
        Box::pin(async move { Ok(removed) })
    }

    fn opted_out_count(&self) -> StoreFuture<'_, usize> {
        let count = self
            .opted_out
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        Box::pin(async move { Ok(count) })
    }
}
