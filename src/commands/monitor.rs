//! Channel monitoring toggle.

use log::info;

use crate::channels::MonitorAction;
use crate::error::Result;

use super::Context;

/// Turn auto-search on or off for this channel, or show its status.
#[poise::command(
    slash_command,
    prefix_command,
    required_permissions = "MANAGE_CHANNELS"
)]
pub async fn monitor(
    ctx: Context<'_>,
    #[description = "on, off, or status"] action: Option<MonitorAction>,
) -> Result<()> {
    let action = action.unwrap_or(MonitorAction::Status);
    let reply = ctx
        .data()
        .monitored()
        .apply(ctx.channel_id(), action)
        .await;

    if action != MonitorAction::Status {
        info!(
            "{} set monitoring {:?} for channel {}",
            ctx.author().tag(),
            action,
            ctx.channel_id()
        );
    }

    ctx.say(reply).await?;
    Ok(())
}
