use crate::bot::Bot;
use crate::telegram::InboundUpdate;
use std::sync::Arc;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;

/// Consume queued updates, handling each on its own task with at most
/// `max_concurrent` in flight. While the limit is reached, updates stay in
/// the queue.
///
/// Returns once every sender is dropped and all in-flight updates finished.
pub async fn run_update_worker(
    mut updates: mpsc::Receiver<InboundUpdate>,
    bot: Arc<Bot>,
    max_concurrent: usize,
) {
    let permits = Arc::new(Semaphore::new(max_concurrent.max(1)));
    let mut tasks = JoinSet::new();

    loop {
        let Ok(permit) = Arc::clone(&permits).acquire_owned().await else {
            break;
        };
        let Some(update) = updates.recv().await else {
            break;
        };

        let bot = Arc::clone(&bot);
        tasks.spawn(async move {
            let outcome = bot.handle_update(&update).await;
            tracing::debug!(update_id = update.update_id, ?outcome, "update handled");
            drop(permit);
        });

        while let Some(result) = tasks.try_join_next() {
            log_task_result(result);
        }
    }

    while let Some(result) = tasks.join_next().await {
        log_task_result(result);
    }
}

fn log_task_result(result: Result<(), tokio::task::JoinError>) {
    if let Err(e) = result {
        tracing::error!(error = %e, "update task panicked");
    }
}
