//! Final reply composition.

use std::fmt::Write;

use log::{debug, error};

use crate::llm::LanguageModel;
use crate::types::{ConversationTurn, SearchResult};

use super::prompt::{SYNTHESIS_CONTEXT, summarize_context, synthesis_prompt};

const EMPTY_RESPONSE: &str =
    "I apologize, but I couldn't generate a proper response at this time.";

/// Render successful results, each tagged with its 1-based position.
pub fn search_info_block(results: &[SearchResult]) -> String {
    let mut block = String::new();
    for (idx, result) in results.iter().enumerate() {
        if result.success {
            let _ = write!(
                block,
                "\nSearch Query {}: {}\nResults: {}\n",
                idx + 1,
                result.query,
                result.results
            );
        }
    }
    block
}

/// Compose the reply. Never fails: model errors become an apology that
/// carries the error text.
pub async fn synthesize<M: LanguageModel>(
    model: &M,
    message: &str,
    results: &[SearchResult],
    context: &[ConversationTurn],
) -> String {
    let summary = summarize_context(context, &SYNTHESIS_CONTEXT);
    let info = search_info_block(results);
    let prompt = synthesis_prompt(&summary, message, &info);

    match model.complete(&prompt).await {
        Ok(text) if text.trim().is_empty() => {
            debug!("Model returned an empty synthesis");
            EMPTY_RESPONSE.to_string()
        }
        Ok(text) => text,
        Err(e) => {
            error!("Error generating response: {e}");
            format!("I encountered an error while processing your request: {e}. Please try again.")
        }
    }
}
