//! Search query extraction.

use std::sync::LazyLock;

use log::{debug, warn};
use regex::Regex;

use crate::llm::LanguageModel;
use crate::types::ConversationTurn;

use super::prompt::{EXTRACTION_CONTEXT, extraction_prompt, summarize_context};

/// Upper bound on queries produced for one message.
pub const MAX_QUERIES: usize = 3;

/// A message must be longer than this (after trimming) to be searched
/// verbatim when the model is unavailable. Tunable.
pub const FALLBACK_MIN_CHARS: usize = 3;

static NUMBERING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.?\s*").expect("numbering pattern is valid"));

fn is_quote(c: char) -> bool {
    c == '"' || c == '\''
}

/// Strip numbering, quotes and surrounding whitespace until none remain.
fn clean_query(line: &str) -> String {
    let mut current = line.to_string();
    loop {
        let stripped = NUMBERING
            .replace(&current, "")
            .trim_matches(|c: char| is_quote(c) || c.is_whitespace())
            .to_string();
        if stripped == current {
            return current;
        }
        current = stripped;
    }
}

/// Turn raw model output into at most [`MAX_QUERIES`] clean queries.
///
/// Blank lines and lines starting with `#` or `-` are dropped.
pub fn parse_queries(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('-'))
        .map(clean_query)
        .filter(|query| !query.is_empty())
        .take(MAX_QUERIES)
        .collect()
}

fn fallback_queries(message: &str) -> Vec<String> {
    if message.trim().chars().count() > FALLBACK_MIN_CHARS {
        vec![message.to_string()]
    } else {
        Vec::new()
    }
}

/// Ask the model for up to three search queries for `message`.
///
/// Never fails: if the model call errors, the message itself becomes the only
/// query, unless it is too short to be useful. An empty list means there is
/// nothing to search for.
pub async fn extract_queries<M: LanguageModel>(
    model: &M,
    message: &str,
    context: &[ConversationTurn],
) -> Vec<String> {
    let summary = summarize_context(context, &EXTRACTION_CONTEXT);
    let prompt = extraction_prompt(&summary, message);

    match model.complete(&prompt).await {
        Ok(text) => {
            let queries = parse_queries(&text);
            debug!("Extracted {} search queries: {queries:?}", queries.len());
            queries
        }
        Err(e) => {
            warn!("Error extracting search queries: {e}");
            fallback_queries(message)
        }
    }
}
