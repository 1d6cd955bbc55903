//! Character-aware string helpers for prompts and Discord messages.

/// Cut `text` to at most `max_chars` characters, marking the cut with `...`.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Split `text` into pieces of at most `chunk_size` characters.
///
/// Returns an empty vector for empty input.
#[must_use]
pub fn split_chunks(text: &str, chunk_size: usize) -> Vec<String> {
    let chunk_size = chunk_size.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut count = 0;

    for c in text.chars() {
        if count == chunk_size {
            chunks.push(std::mem::take(&mut current));
            count = 0;
        }
        current.push(c);
        count += 1;
    }
    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

/// Split a reply only when it exceeds `max_len` characters.
#[must_use]
pub fn split_message(text: &str, max_len: usize, chunk_size: usize) -> Vec<String> {
    if text.chars().count() <= max_len {
        vec![text.to_string()]
    } else {
        split_chunks(text, chunk_size)
    }
}
