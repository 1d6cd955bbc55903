//! Scheduled purge of old conversation turns.

use std::time::Duration;

use chrono::TimeDelta;
use log::{error, info};
use tokio::task::JoinHandle;

use super::store::ConversationStore;

/// How often the retention task wakes up.
pub const RETENTION_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Purge turns older than `max_age` now and then every `every`.
pub fn spawn_retention(
    store: ConversationStore,
    max_age: TimeDelta,
    every: Duration,
) -> JoinHandle<()> {
    info!("Scheduling retention cleanup of turns older than {max_age}");
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            if let Err(e) = store.purge_older_than(max_age).await {
                error!("Retention cleanup failed: {e}");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::types::ConversationTurn;

    #[tokio::test]
    async fn first_purge_runs_immediately() {
        let store = ConversationStore::in_memory().expect("store");
        store
            .record_turn(
                ConversationTurn::new("u", "c", "old")
                    .with_timestamp(Utc::now() - TimeDelta::days(40)),
            )
            .await
            .expect("record");
        store
            .record_turn(ConversationTurn::new("u", "c", "new"))
            .await
            .expect("record");

        let handle = spawn_retention(store.clone(), TimeDelta::days(30), RETENTION_INTERVAL);

        let mut remaining = Vec::new();
        for _ in 0..100 {
            remaining = store
                .channel_context("c", TimeDelta::days(365), 10)
                .await
                .expect("channel context");
            if remaining.len() == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        handle.abort();

        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].message, "new");
    }
}
