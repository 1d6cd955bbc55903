use poise::CreateReply;
use poise::serenity_prelude::{CreateEmbed, CreateEmbedFooter};

use crate::error::Result;

use super::Context;

fn commands_text(prefix: &str) -> String {
    format!(
        "`{prefix}search <query>` - Manual web search\n\
         `{prefix}logs [date]` - Get conversation logs\n\
         `{prefix}monitor [on/off/status]` - Manage channel monitoring\n\
         `{prefix}help` - Show this help message"
    )
}

fn log_examples_text(prefix: &str) -> String {
    format!(
        "`{prefix}logs` - Today's logs\n\
         `{prefix}logs yesterday` - Yesterday's logs\n\
         `{prefix}logs 2024-01-15` - Specific date\n\
         `{prefix}logs 7days` - Last 7 days"
    )
}

/// Show help information.
#[poise::command(slash_command, prefix_command)]
pub async fn help(ctx: Context<'_>) -> Result<()> {
    let prefix = &ctx.data().settings().command_prefix;

    let embed = CreateEmbed::new()
        .title("🤖 Search Bot Help")
        .description(
            "I answer questions by searching for current information and summarizing what I find.",
        )
        .color(0x00ff00)
        .field(
            "🔍 Auto Search",
            "I automatically search and respond to messages in monitored channels",
            false,
        )
        .field("📝 Commands", commands_text(prefix), false)
        .field("📅 Log Examples", log_examples_text(prefix), false)
        .footer(CreateEmbedFooter::new(
            "Slash commands work too: /search, /logs, /monitor, /help",
        ));

    ctx.send(CreateReply::default().embed(embed).reply(true))
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_uses_configured_prefix() {
        let text = commands_text("?");
        assert!(text.contains("`?search <query>`"));
        assert!(!text.contains('!'));
        assert!(log_examples_text("?").contains("`?logs 7days`"));
    }
}
