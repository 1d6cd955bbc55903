//! Conversation memory persisted in SQLite.

mod db;
mod retention;
mod store;

pub use db::Database;
pub use retention::{RETENTION_INTERVAL, spawn_retention};
pub use store::ConversationStore;
