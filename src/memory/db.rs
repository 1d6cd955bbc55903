//! Database connection management.
//!
//! Wraps a single rusqlite Connection in a Mutex so every statement runs
//! against one always-open schema, one turn at a time.

use std::path::Path;
use std::sync::Mutex;

use log::{debug, info};
use rusqlite::Connection;

use crate::error::{BotError, Result};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS conversations (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id     TEXT NOT NULL,
        channel_id  TEXT NOT NULL,
        message     TEXT NOT NULL,
        response    TEXT,
        timestamp   INTEGER NOT NULL
                    DEFAULT (CAST((julianday('now') - 2440587.5) * 86400000 AS INTEGER)),
        search_query TEXT
    );

    CREATE INDEX IF NOT EXISTS idx_conversations_channel_time
        ON conversations (channel_id, timestamp);

    CREATE INDEX IF NOT EXISTS idx_conversations_user_channel_time
        ON conversations (user_id, channel_id, timestamp);
";

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a database at the given path and ensure the schema exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or SQLite
    /// fails to open the file.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;

        info!("Conversation database opened at {}", path.display());
        Self::with_schema(conn)
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if SQLite fails to initialize.
    pub fn in_memory() -> Result<Self> {
        Self::with_schema(Connection::open_in_memory()?)
    }

    fn with_schema(conn: Connection) -> Result<Self> {
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init_schema()?;
        Ok(db)
    }

    /// Create the conversations table and its indexes if absent. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the DDL fails.
    pub fn init_schema(&self) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute_batch(SCHEMA)?;
            debug!("Conversation schema ready");
            Ok(())
        })
    }

    /// Run a closure against the connection while holding the lock.
    ///
    /// # Errors
    ///
    /// Returns the closure's error, or `StorageLock` if the mutex is poisoned.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| BotError::StorageLock(e.to_string()))?;
        f(&conn)
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish_non_exhaustive()
    }
}
