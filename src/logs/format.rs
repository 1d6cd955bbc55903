//! Rendering stored turns for Discord.

use crate::text::{split_chunks, truncate_chars};
use crate::types::ConversationTurn;

const ENTRY_CHARS: usize = 100;

/// One line per message, one per reply, and a blank separator per turn.
pub fn format_log_entries(turns: &[ConversationTurn]) -> String {
    let mut lines = Vec::with_capacity(turns.len() * 3);

    for turn in turns {
        lines.push(format!(
            "**{}** <@{}>: {}",
            turn.timestamp.format("%H:%M:%S"),
            turn.user_id,
            truncate_chars(&turn.message, ENTRY_CHARS)
        ));
        if let Some(response) = turn.response.as_deref().filter(|r| !r.is_empty()) {
            lines.push(format!("🤖: {}", truncate_chars(response, ENTRY_CHARS)));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

/// Keep `text` on one page when it fits, otherwise split it into pages.
pub fn paginate(text: &str, page_chars: usize) -> Vec<String> {
    if text.chars().count() <= page_chars {
        vec![text.to_string()]
    } else {
        split_chunks(text, page_chars)
    }
}
