//! Periodic pruning of expired images
//!
//! Disabled unless `images.prune_interval_secs` is non-zero.

use std::sync::Arc;
use std::time::Duration;

use super::ImageStore;
use crate::server::signal::SignalHandler;

/// Spawn a task that prunes the store every `every` until shutdown
pub fn spawn_prune_task(
    store: Arc<ImageStore>,
    every: Duration,
    max_age: Duration,
    signals: Arc<SignalHandler>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        tracing::info!(
            interval_secs = every.as_secs(),
            max_age_secs = max_age.as_secs(),
            "image pruning enabled"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                () = signals.shutdown.notified() => break,
            }
            if signals.is_shutdown_requested() {
                break;
            }

            let store = Arc::clone(&store);
            match tokio::task::spawn_blocking(move || store.prune_older_than(max_age)).await {
                Ok(Ok(report)) if !report.removed.is_empty() => {
                    tracing::info!(removed = report.removed.len(), kept = report.kept, "pruned expired images");
                }
                Ok(Ok(_)) => {}
                Ok(Err(e)) => tracing::warn!(error = %e, "image pruning failed"),
                Err(e) => tracing::error!(error = %e, "image pruning task panicked"),
            }
        }

        tracing::debug!("image pruning stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_prune_task_stops_on_shutdown() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(ImageStore::open(dir.path()).unwrap());
        File::create(dir.path().join("fresh.png")).unwrap();

        let signals = Arc::new(SignalHandler::new());
        let handle = spawn_prune_task(
            Arc::clone(&store),
            Duration::from_millis(10),
            Duration::from_secs(600),
            Arc::clone(&signals),
        );

        tokio::time::sleep(Duration::from_millis(50)).await;
        signals.request_shutdown();
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("prune task should stop")
            .unwrap();

        // Nothing was old enough to delete
        assert!(store.exists("fresh.png"));
    }
}
