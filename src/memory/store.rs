//! Async conversation store over the SQLite database.
//!
//! Every operation runs on the blocking pool so callers can await it from the
//! Discord event loop without stalling other messages.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use log::{debug, info};
use rusqlite::{Connection, Row, params};

use crate::error::{BotError, Result};
use crate::types::{ContextWindow, ConversationTurn};

use super::db::Database;

const TURN_COLUMNS: &str = "user_id, channel_id, message, response, search_query, timestamp";

#[derive(Debug, Clone)]
pub struct ConversationStore {
    db: Arc<Database>,
}

impl ConversationStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Open the on-disk store at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open(path: &std::path::Path) -> Result<Self> {
        Ok(Self::new(Arc::new(Database::open(path)?)))
    }

    /// Open a throwaway store that lives only as long as this value.
    ///
    /// # Errors
    ///
    /// Returns an error if SQLite fails to initialize.
    pub fn in_memory() -> Result<Self> {
        Ok(Self::new(Arc::new(Database::in_memory()?)))
    }

    async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || db.with_conn(f)).await?
    }

    /// Append a turn.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the user, channel or message is empty, and a
    /// storage error if the insert fails.
    pub async fn record_turn(&self, turn: ConversationTurn) -> Result<()> {
        if turn.user_id.is_empty() || turn.channel_id.is_empty() || turn.message.is_empty() {
            return Err(BotError::Validation(
                "A conversation turn needs a user, a channel and a message".to_string(),
            ));
        }

        self.run(move |conn| {
            conn.execute(
                "INSERT INTO conversations
                    (user_id, channel_id, message, response, search_query, timestamp)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    turn.user_id,
                    turn.channel_id,
                    turn.message,
                    turn.response,
                    turn.search_query,
                    turn.timestamp.timestamp_millis(),
                ],
            )?;
            debug!(
                "Recorded turn for user {} in channel {}",
                turn.user_id, turn.channel_id
            );
            Ok(())
        })
        .await
    }

    /// Most recent turns of one user in one channel, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a negative `max_age` and a storage error if
    /// the query fails.
    pub async fn recent_context(
        &self,
        user_id: &str,
        channel_id: &str,
        max_age: TimeDelta,
        max_count: usize,
    ) -> Result<ContextWindow> {
        let user_id = user_id.to_string();
        let channel_id = channel_id.to_string();
        let since = cutoff_millis(max_age)?;
        let limit = to_sql_limit(max_count);

        self.run(move |conn| {
            let sql = format!(
                "SELECT {TURN_COLUMNS} FROM conversations
                 WHERE user_id = ?1 AND channel_id = ?2 AND timestamp > ?3
                 ORDER BY timestamp DESC, id DESC
                 LIMIT ?4"
            );
            let mut turns = query_turns(conn, &sql, params![user_id, channel_id, since, limit])?;
            turns.reverse();
            Ok(turns)
        })
        .await
    }

    /// Most recent turns of every user in a channel, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a negative `max_age` and a storage error if
    /// the query fails.
    pub async fn channel_context(
        &self,
        channel_id: &str,
        max_age: TimeDelta,
        max_count: usize,
    ) -> Result<ContextWindow> {
        let channel_id = channel_id.to_string();
        let since = cutoff_millis(max_age)?;
        let limit = to_sql_limit(max_count);

        self.run(move |conn| {
            let sql = format!(
                "SELECT {TURN_COLUMNS} FROM conversations
                 WHERE channel_id = ?1 AND timestamp > ?2
                 ORDER BY timestamp DESC, id DESC
                 LIMIT ?3"
            );
            let mut turns = query_turns(conn, &sql, params![channel_id, since, limit])?;
            turns.reverse();
            Ok(turns)
        })
        .await
    }

    /// All turns of a channel in `[start, end)`, ascending by timestamp.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the query fails.
    pub async fn turns_in_range(
        &self,
        channel_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ConversationTurn>> {
        let channel_id = channel_id.to_string();
        let start = start.timestamp_millis();
        let end = end.timestamp_millis();

        self.run(move |conn| {
            let sql = format!(
                "SELECT {TURN_COLUMNS} FROM conversations
                 WHERE channel_id = ?1 AND timestamp >= ?2 AND timestamp < ?3
                 ORDER BY timestamp ASC, id ASC"
            );
            query_turns(conn, &sql, params![channel_id, start, end])
        })
        .await
    }

    /// Delete every turn older than `max_age`, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a negative `max_age` and a storage error if
    /// the delete fails.
    pub async fn purge_older_than(&self, max_age: TimeDelta) -> Result<usize> {
        let cutoff = cutoff_millis(max_age)?;

        let deleted = self
            .run(move |conn| {
                Ok(conn.execute(
                    "DELETE FROM conversations WHERE timestamp < ?1",
                    params![cutoff],
                )?)
            })
            .await?;

        info!("Purged {deleted} conversation turns older than {max_age}");
        Ok(deleted)
    }
}

/// Oldest timestamp still inside `max_age`, in Unix milliseconds.
///
/// Windows reaching past the earliest representable date mean "no cutoff".
fn cutoff_millis(max_age: TimeDelta) -> Result<i64> {
    if max_age < TimeDelta::zero() {
        return Err(BotError::Validation(format!(
            "Age window must not be negative, got {max_age}"
        )));
    }
    let cutoff = Utc::now()
        .checked_sub_signed(max_age)
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    Ok(cutoff.timestamp_millis())
}

fn to_sql_limit(count: usize) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}

fn query_turns(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<ConversationTurn>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, row_to_turn)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

fn row_to_turn(row: &Row<'_>) -> rusqlite::Result<ConversationTurn> {
    let millis: i64 = row.get(5)?;
    let timestamp = DateTime::from_timestamp_millis(millis)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(5, millis))?;

    Ok(ConversationTurn {
        user_id: row.get(0)?,
        channel_id: row.get(1)?,
        message: row.get(2)?,
        response: row.get(3)?,
        search_query: row.get(4)?,
        timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ConversationStore {
        ConversationStore::in_memory().expect("in-memory store")
    }

    fn turn_at(user: &str, channel: &str, message: &str, age: TimeDelta) -> ConversationTurn {
        ConversationTurn::new(user, channel, message).with_timestamp(Utc::now() - age)
    }

    fn messages(turns: &[ConversationTurn]) -> Vec<&str> {
        turns.iter().map(|t| t.message.as_str()).collect()
    }

    #[tokio::test]
    async fn recorded_turn_round_trips() {
        let store = store();
        let before = Utc::now();
        let turn = ConversationTurn::new("42", "7", "What's new in Rust?")
            .with_response("Rust 1.90 shipped.")
            .with_queries(&["rust release notes".to_string(), "rust 1.90".to_string()]);
        store.record_turn(turn.clone()).await.expect("record");
        let after = Utc::now();

        let context = store
            .recent_context("42", "7", TimeDelta::hours(24), 5)
            .await
            .expect("recent context");
        assert_eq!(context.len(), 1);
        let stored = &context[0];
        assert_eq!(stored.message, turn.message);
        assert_eq!(stored.response, turn.response);
        assert_eq!(
            stored.search_query.as_deref(),
            Some("rust release notes; rust 1.90")
        );
        assert_eq!(
            stored.timestamp.timestamp_millis(),
            turn.timestamp.timestamp_millis()
        );
        assert!(stored.timestamp.timestamp_millis() >= before.timestamp_millis());
        assert!(stored.timestamp <= after);

        let channel = store
            .channel_context("7", TimeDelta::hours(24), 20)
            .await
            .expect("channel context");
        assert_eq!(channel, context);
    }

    #[tokio::test]
    async fn recent_context_is_bounded_and_chronological() {
        let store = store();
        store
            .record_turn(turn_at("u", "c", "stale", TimeDelta::hours(25)))
            .await
            .expect("record");
        for minutes in (1..=7).rev() {
            store
                .record_turn(turn_at("u", "c", &format!("m{minutes}"), TimeDelta::minutes(minutes)))
                .await
                .expect("record");
        }
        store
            .record_turn(turn_at("other", "c", "someone else", TimeDelta::minutes(1)))
            .await
            .expect("record");
        store
            .record_turn(turn_at("u", "elsewhere", "other channel", TimeDelta::minutes(1)))
            .await
            .expect("record");

        let context = store
            .recent_context("u", "c", TimeDelta::hours(24), 5)
            .await
            .expect("recent context");
        assert_eq!(messages(&context), vec!["m5", "m4", "m3", "m2", "m1"]);
    }

    #[tokio::test]
    async fn recent_context_empty_is_not_an_error() {
        let context = store()
            .recent_context("nobody", "nowhere", TimeDelta::hours(24), 5)
            .await
            .expect("recent context");
        assert!(context.is_empty());
    }

    #[tokio::test]
    async fn channel_context_spans_users() {
        let store = store();
        store
            .record_turn(turn_at("a", "c", "first", TimeDelta::minutes(3)))
            .await
            .expect("record");
        store
            .record_turn(turn_at("b", "c", "second", TimeDelta::minutes(2)))
            .await
            .expect("record");
        store
            .record_turn(turn_at("a", "c", "too old", TimeDelta::hours(3)))
            .await
            .expect("record");

        let context = store
            .channel_context("c", TimeDelta::hours(2), 20)
            .await
            .expect("channel context");
        assert_eq!(messages(&context), vec!["first", "second"]);
        assert_eq!(context[1].user_id, "b");
    }

    #[tokio::test]
    async fn same_timestamp_keeps_insertion_order() {
        let store = store();
        let at = Utc::now();
        for message in ["one", "two", "three"] {
            store
                .record_turn(ConversationTurn::new("u", "c", message).with_timestamp(at))
                .await
                .expect("record");
        }

        let context = store
            .recent_context("u", "c", TimeDelta::hours(1), 10)
            .await
            .expect("recent context");
        assert_eq!(messages(&context), vec!["one", "two", "three"]);
    }

    #[tokio::test]
    async fn range_is_half_open_and_ascending() {
        let store = store();
        let start = Utc::now() - TimeDelta::days(2);
        let end = start + TimeDelta::days(1);

        for (message, at) in [
            ("at start", start),
            ("inside", start + TimeDelta::hours(5)),
            ("at end", end),
            ("before", start - TimeDelta::seconds(1)),
        ] {
            store
                .record_turn(ConversationTurn::new("u", "c", message).with_timestamp(at))
                .await
                .expect("record");
        }

        let turns = store
            .turns_in_range("c", start, end)
            .await
            .expect("range query");
        assert_eq!(messages(&turns), vec!["at start", "inside"]);
    }

    #[tokio::test]
    async fn purge_removes_only_old_turns() {
        let store = store();
        store
            .record_turn(turn_at("u", "c", "ancient", TimeDelta::days(45)))
            .await
            .expect("record");
        store
            .record_turn(turn_at("u", "c", "old", TimeDelta::days(31)))
            .await
            .expect("record");
        store
            .record_turn(turn_at("u", "c", "fresh", TimeDelta::days(2)))
            .await
            .expect("record");

        let deleted = store
            .purge_older_than(TimeDelta::days(30))
            .await
            .expect("purge");
        assert_eq!(deleted, 2);

        let remaining = store
            .channel_context("c", TimeDelta::days(365), 100)
            .await
            .expect("channel context");
        assert_eq!(messages(&remaining), vec!["fresh"]);
    }

    #[tokio::test]
    async fn rejects_turn_without_message() {
        let err = store()
            .record_turn(ConversationTurn::new("u", "c", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, BotError::Validation(_)));
    }

    #[tokio::test]
    async fn unbounded_age_window_means_no_cutoff() {
        let store = store();
        store
            .record_turn(turn_at("u", "c", "years ago", TimeDelta::days(3650)))
            .await
            .expect("record");

        let context = store
            .recent_context("u", "c", TimeDelta::MAX, 5)
            .await
            .expect("recent context");
        assert_eq!(messages(&context), vec!["years ago"]);

        let channel = store
            .channel_context("c", TimeDelta::MAX, 5)
            .await
            .expect("channel context");
        assert_eq!(channel.len(), 1);

        let deleted = store.purge_older_than(TimeDelta::MAX).await.expect("purge");
        assert_eq!(deleted, 0);
    }

    #[tokio::test]
    async fn negative_purge_window_deletes_nothing() {
        let store = store();
        store
            .record_turn(turn_at("u", "c", "just now", TimeDelta::zero()))
            .await
            .expect("record");

        let err = store.purge_older_than(TimeDelta::days(-1)).await.unwrap_err();
        assert!(matches!(err, BotError::Validation(_)));

        let remaining = store
            .channel_context("c", TimeDelta::hours(1), 5)
            .await
            .expect("channel context");
        assert_eq!(messages(&remaining), vec!["just now"]);
    }

    #[tokio::test]
    async fn concurrent_writes_all_land() {
        let store = store();
        let mut handles = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .record_turn(ConversationTurn::new(format!("user{i}"), "c", format!("m{i}")))
                    .await
            }));
        }
        for handle in handles {
            handle.await.expect("join").expect("record");
        }

        let all = store
            .channel_context("c", TimeDelta::hours(1), 100)
            .await
            .expect("channel context");
        assert_eq!(all.len(), 16);
    }
}
