use crate::error::StoreError;
use std::future::Future;
use std::pin::Pin;

/// Telegram user id of the person who sent an update.
pub type SenderId = i64;

pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Opt-out list shared by the command router and the dispatcher.
///
/// Implementations must tolerate concurrent reads and concurrent opt-out
/// writes for different senders.
pub trait SubscriberStore: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &str;

    fn is_opted_out(&self, sender: SenderId) -> StoreFuture<'_, bool>;

    /// Record an opt-out. Resolves to `true` if the sender was not opted out before.
    fn opt_out(&self, sender: SenderId) -> StoreFuture<'_, bool>;

    /// Clear an opt-out. Resolves to `true` if the sender had opted out.
    fn opt_in(&self, sender: SenderId) -> StoreFuture<'_, bool>;

    fn opted_out_count(&self) -> StoreFuture<'_, usize>;
}
