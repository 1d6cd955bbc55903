//! Resolving queries into information blobs.

use std::time::Duration;

use log::{debug, warn};

use crate::llm::LanguageModel;
use crate::types::SearchResult;

use super::prompt::search_prompt;

/// Floor for the wait between two consecutive search calls.
pub const MIN_PACING: Duration = Duration::from_millis(500);

/// Resolve one query. Failures are captured in the result, never returned.
pub async fn gather<M: LanguageModel>(model: &M, query: &str) -> SearchResult {
    match model.complete(&search_prompt(query)).await {
        Ok(text) => {
            let results = if text.is_empty() {
                "No results found".to_string()
            } else {
                text
            };
            SearchResult {
                query: query.to_string(),
                results,
                success: true,
            }
        }
        Err(e) => {
            warn!("Search failed for query {query:?}: {e}");
            SearchResult {
                query: query.to_string(),
                results: format!("Search error: {e}"),
                success: false,
            }
        }
    }
}

/// Resolve every query in order, one at a time, waiting `pacing` (at least
/// [`MIN_PACING`]) between consecutive calls to stay under upstream rate limits.
pub async fn gather_all<M: LanguageModel>(
    model: &M,
    queries: &[String],
    pacing: Duration,
) -> Vec<SearchResult> {
    let pacing = pacing.max(MIN_PACING);
    let mut results = Vec::with_capacity(queries.len());

    for (idx, query) in queries.iter().enumerate() {
        if idx > 0 {
            tokio::time::sleep(pacing).await;
        }
        debug!("Gathering information for query {}: {query}", idx + 1);
        results.push(gather(model, query).await);
    }

    results
}
