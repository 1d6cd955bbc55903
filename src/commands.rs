//! Poise commands for searching, logs and channel monitoring.

mod help;
mod logs;
mod monitor;
mod search;

use crate::bot::Data;
use crate::error::BotError;

/// Context type for bot commands.
pub type Context<'a> = poise::Context<'a, Data, BotError>;

/// Get all bot commands.
#[must_use]
pub fn all_commands() -> Vec<poise::Command<Data, BotError>> {
    vec![
        search::search(),
        logs::logs(),
        monitor::monitor(),
        help::help(),
    ]
}
