//! Reply delivery for Discord's message length limit.

use log::info;
use poise::serenity_prelude::{Context, Message as SerenityMessage};

use crate::error::Result;
use crate::text::split_message;

/// Reply to `message` with `text`, splitting it when it exceeds `max_len`.
pub async fn send_chunked_reply(
    ctx: &Context,
    message: &SerenityMessage,
    text: &str,
    max_len: usize,
    chunk_size: usize,
) -> Result<()> {
    let chunks = split_message(text, max_len, chunk_size);
    let total = chunks.len();

    for chunk in chunks.iter().filter(|chunk| !chunk.is_empty()) {
        message.reply(&ctx.http, chunk).await?;
    }

    info!(
        "Replied to {} in channel {} ({} part(s))",
        message.author.tag(),
        message.channel_id,
        total
    );
    Ok(())
}
