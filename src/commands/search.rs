//! Manual search command.

use log::info;
use poise::CreateReply;
use poise::serenity_prelude::{CreateEmbed, CreateEmbedFooter, Timestamp};

use crate::error::{BotError, Result};
use crate::text::truncate_chars;

use super::Context;

const SEARCH_COLOR: u32 = 0x00ff00;
const EMBED_DESCRIPTION_LIMIT: usize = 4096;
const EMBED_FIELD_LIMIT: usize = 1024;

/// Bulleted list of queries for the embed field.
fn queries_field(queries: &[String]) -> String {
    if queries.is_empty() {
        return "None".to_string();
    }
    let list = queries
        .iter()
        .map(|query| format!("• {query}"))
        .collect::<Vec<_>>()
        .join("\n");
    truncate_chars(&list, EMBED_FIELD_LIMIT - 3)
}

/// Search the web for a query and answer it.
#[poise::command(slash_command, prefix_command)]
pub async fn search(
    ctx: Context<'_>,
    #[description = "What to search for"]
    #[rest]
    query: String,
) -> Result<()> {
    let query = query.trim();
    if query.is_empty() {
        return Err(BotError::Validation(
            "Please tell me what to search for.".to_string(),
        ));
    }

    ctx.defer().await?;

    let author = ctx.author();
    let result = ctx
        .data()
        .assistant()
        .handle_message(
            &author.id.to_string(),
            &ctx.channel_id().to_string(),
            query,
        )
        .await?;

    let requester = author.global_name.as_ref().unwrap_or(&author.name);
    let embed = CreateEmbed::new()
        .title("🔍 Search Results")
        .description(truncate_chars(
            &result.response,
            EMBED_DESCRIPTION_LIMIT - 3,
        ))
        .color(SEARCH_COLOR)
        .timestamp(Timestamp::now())
        .field(
            "Search Queries Used",
            queries_field(&result.search_queries),
            false,
        )
        .footer(CreateEmbedFooter::new(format!("Requested by {requester}")));

    ctx.send(CreateReply::default().embed(embed).reply(true))
        .await?;

    info!(
        "Answered search from {} in channel {} with {} queries",
        author.tag(),
        ctx.channel_id(),
        result.search_queries.len()
    );
    Ok(())
}
