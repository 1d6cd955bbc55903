//! Handler for messages posted in monitored channels.

use log::{debug, error, info};
use poise::serenity_prelude::{Context, Message as SerenityMessage};

use crate::bot::Data;
use crate::error::Result;

use super::response::send_chunked_reply;

/// Whether `content` is a substantial, non-command message.
fn is_search_candidate(content: &str, command_prefix: &str, min_length: usize) -> bool {
    let is_command = !command_prefix.is_empty() && content.starts_with(command_prefix);
    !is_command && content.chars().count() > min_length
}

/// Search and reply to a message if it was posted in a monitored channel.
pub async fn handle_auto_search(
    ctx: &Context,
    new_message: &SerenityMessage,
    data: &Data,
) -> Result<()> {
    let settings = data.settings();
    if new_message.author.bot
        || !is_search_candidate(
            &new_message.content,
            &settings.command_prefix,
            settings.auto_search_min_length,
        )
        || !data.monitored().contains(new_message.channel_id).await
    {
        return Ok(());
    }

    info!(
        "Auto-searching message from {} in channel {}: {}",
        new_message.author.tag(),
        new_message.channel_id,
        new_message.content
    );

    if let Err(e) = new_message.channel_id.broadcast_typing(&ctx.http).await {
        debug!("Failed to broadcast typing indicator: {e}");
    }

    match data
        .assistant()
        .handle_message(
            &new_message.author.id.to_string(),
            &new_message.channel_id.to_string(),
            &new_message.content,
        )
        .await
    {
        Ok(result) => {
            send_chunked_reply(
                ctx,
                new_message,
                &result.response,
                settings.max_response_length,
                settings.chunk_size,
            )
            .await?;
        }
        Err(e) => {
            error!(
                "Error in auto search for {}: {}",
                new_message.author.tag(),
                e
            );
            new_message.reply(&ctx.http, e.user_message()).await?;
        }
    }

    Ok(())
}
