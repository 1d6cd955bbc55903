//! Common types used throughout the searchbot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of a chat message. Requests are sent as `User`; replies come back as
/// `Assistant`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message from the human user
    User,
    /// Message from the AI assistant
    Assistant,
}

/// One logged message/response exchange for a user in a channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationTurn {
    pub user_id: String,
    pub channel_id: String,
    pub message: String,
    /// Absent when processing failed before synthesis
    pub response: Option<String>,
    /// Queries used for this turn, joined by [`QUERY_DELIMITER`]
    pub search_query: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Separator used when persisting the queries of a turn.
pub const QUERY_DELIMITER: &str = "; ";

impl ConversationTurn {
    /// Create a turn stamped with the current time.
    pub fn new(
        user_id: impl Into<String>,
        channel_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            channel_id: channel_id.into(),
            message: message.into(),
            response: None,
            search_query: None,
            timestamp: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.response = Some(response.into());
        self
    }

    /// Attach the queries used, joined with [`QUERY_DELIMITER`].
    #[must_use]
    pub fn with_queries(mut self, queries: &[String]) -> Self {
        self.search_query = Some(queries.join(QUERY_DELIMITER));
        self
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Chronological (oldest first) slice of prior turns.
pub type ContextWindow = Vec<ConversationTurn>;

/// Outcome of resolving one query into an information blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub query: String,
    pub results: String,
    pub success: bool,
}

/// Everything produced while handling one incoming message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineResult {
    pub response: String,
    pub search_queries: Vec<String>,
    pub search_results: Vec<SearchResult>,
}
