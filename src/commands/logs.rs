//! Conversation log command.

use chrono::Utc;
use log::debug;
use poise::CreateReply;
use poise::serenity_prelude::{CreateEmbed, CreateEmbedFooter, Timestamp};

use crate::error::Result;
use crate::logs::{LogRange, format_log_entries, paginate};

use super::Context;

const LOG_COLOR: u32 = 0x0099ff;
const LOG_PAGE_CHARS: usize = 1900;

/// Show logged conversations for this channel.
#[poise::command(slash_command, prefix_command)]
pub async fn logs(
    ctx: Context<'_>,
    #[description = "today, yesterday, 7days, or YYYY-MM-DD"] date: Option<String>,
) -> Result<()> {
    let range = LogRange::parse(date.as_deref(), Utc::now())?;
    debug!(
        "Fetching logs for channel {} from {} to {}",
        ctx.channel_id(),
        range.start,
        range.end
    );

    let turns = ctx
        .data()
        .assistant()
        .store()
        .turns_in_range(&ctx.channel_id().to_string(), range.start, range.end)
        .await?;

    if turns.is_empty() {
        ctx.say(format!("No logs found for {}", range.title.to_lowercase()))
            .await?;
        return Ok(());
    }

    let text = format_log_entries(&turns);
    let pages = paginate(&text, LOG_PAGE_CHARS);

    if let [page] = pages.as_slice() {
        let embed = CreateEmbed::new()
            .title(format!("📋 {}", range.title))
            .description(page)
            .color(LOG_COLOR)
            .timestamp(Timestamp::now())
            .footer(CreateEmbedFooter::new(format!(
                "{} conversations found",
                turns.len()
            )));
        ctx.send(CreateReply::default().embed(embed).reply(true))
            .await?;
        return Ok(());
    }

    ctx.say(format!(
        "📋 **{}** ({} conversations)",
        range.title,
        turns.len()
    ))
    .await?;

    let total = pages.len();
    for (idx, page) in pages.into_iter().enumerate() {
        let embed = CreateEmbed::new()
            .description(page)
            .color(LOG_COLOR)
            .footer(CreateEmbedFooter::new(format!("Part {}/{total}", idx + 1)));
        ctx.send(CreateReply::default().embed(embed)).await?;
    }

    Ok(())
}
