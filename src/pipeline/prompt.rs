//! Prompt construction for the three model calls.

use std::fmt::Write;

use crate::types::ConversationTurn;

/// How prior turns are rendered into a prompt.
pub struct ContextStyle {
    pub max_turns: usize,
    pub assistant_label: &'static str,
    pub response_chars: usize,
}

pub const EXTRACTION_CONTEXT: ContextStyle = ContextStyle {
    max_turns: 5,
    assistant_label: "Bot",
    response_chars: 100,
};

pub const SYNTHESIS_CONTEXT: ContextStyle = ContextStyle {
    max_turns: 3,
    assistant_label: "Assistant",
    response_chars: 150,
};

/// Render the tail of `context` as `User:`/assistant lines, oldest first.
///
/// Responses are cut to a fixed prefix and always end in `...`.
pub fn summarize_context(context: &[ConversationTurn], style: &ContextStyle) -> String {
    let start = context.len().saturating_sub(style.max_turns);
    let mut lines = Vec::new();

    for turn in &context[start..] {
        if !turn.message.is_empty() {
            lines.push(format!("User: {}", turn.message));
        }
        if let Some(response) = turn.response.as_deref().filter(|r| !r.is_empty()) {
            let excerpt: String = response.chars().take(style.response_chars).collect();
            lines.push(format!("{}: {excerpt}...", style.assistant_label));
        }
    }

    lines.join("\n")
}

pub fn extraction_prompt(context_summary: &str, message: &str) -> String {
    format!(
        "Based on this conversation context and the current message, extract 1-3 specific \
web search queries that would help answer the user's question or provide relevant information.

Context (recent conversation):
{context_summary}

Current message: {message}

Please provide search queries that are:
1. Specific and targeted
2. Likely to return relevant results
3. Consider the conversation context
4. Written in a way that search engines can understand

Return only the search queries, one per line, without any additional text or formatting."
    )
}

pub fn search_prompt(query: &str) -> String {
    format!(
        "I need you to act as a web search engine. Based on this search query: \"{query}\"

Please provide information that would typically be found through web search, including:
1. Current and relevant information about the topic
2. Multiple perspectives if applicable
3. Recent developments or news if relevant
4. Factual data and statistics when available

Format your response as if you're providing search results with relevant, up-to-date information."
    )
}

pub fn synthesis_prompt(context_summary: &str, message: &str, search_info: &str) -> String {
    let mut prompt = String::from(
        "You are a helpful AI assistant that provides comprehensive answers based on web \
search results and conversation context.\n",
    );

    let _ = write!(prompt, "\nConversation Context:\n{context_summary}\n");
    let _ = write!(prompt, "\nCurrent User Message: {message}\n");
    let _ = write!(prompt, "\nWeb Search Information:\n{search_info}\n");

    prompt.push_str(
        "
Please provide a helpful, informative response that:
1. Directly addresses the user's question or message
2. Uses the search information to provide accurate, current details
3. Considers the conversation context for continuity
4. Is conversational and engaging
5. Cites or references the information sources when relevant
6. Keeps the response concise but comprehensive (aim for 2-4 paragraphs)

If the search results don't contain relevant information, acknowledge this and provide what \
helpful information you can based on your knowledge.",
    );

    prompt
}
