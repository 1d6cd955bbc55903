//! Discord bot core logic and event handling.

use log::{debug, error, info, warn};
use poise::{
    Framework, FrameworkError, FrameworkOptions, PrefixFrameworkOptions, builtins,
    serenity_prelude::{ChannelId, ClientBuilder, Context, FullEvent, GatewayIntents},
};

use crate::autosearch::handle_auto_search;
use crate::channels::MonitoredChannels;
use crate::commands::all_commands;
use crate::config::Config;
use crate::error::{BotError, Result};
use crate::memory::{ConversationStore, RETENTION_INTERVAL, spawn_retention};
use crate::openrouter::OpenRouterClient;
use crate::pipeline::{ContextLimits, SearchAssistant, SearchPipeline};

/// Adapter-level settings read by handlers and commands.
#[derive(Debug, Clone)]
pub struct BotSettings {
    pub command_prefix: String,
    pub auto_search_min_length: usize,
    pub max_response_length: usize,
    pub chunk_size: usize,
}

pub struct Data {
    assistant: SearchAssistant<OpenRouterClient>,
    monitored: MonitoredChannels,
    settings: BotSettings,
}

impl Data {
    #[must_use]
    pub fn assistant(&self) -> &SearchAssistant<OpenRouterClient> {
        &self.assistant
    }

    #[must_use]
    pub fn monitored(&self) -> &MonitoredChannels {
        &self.monitored
    }

    #[must_use]
    pub fn settings(&self) -> &BotSettings {
        &self.settings
    }
}

/// Run the Discord bot.
///
/// # Errors
///
/// Returns an error if configuration, the database, or the Discord client
/// fails to initialize, or if the client stops with an error.
pub async fn run() -> Result<()> {
    info!("Initializing bot");
    let config = Config::from_env()?;

    debug!("Opening conversation store");
    let store = ConversationStore::open(&config.database_path)?;
    spawn_retention(store.clone(), config.retention, RETENTION_INTERVAL);

    debug!("Initializing OpenRouter client");
    let openrouter_client = OpenRouterClient::new(
        config.openrouter_api_key.clone(),
        config.openrouter_model.clone(),
        config.generation.clone(),
    );
    let assistant = SearchAssistant::new(
        SearchPipeline::new(openrouter_client, config.search_pacing),
        store,
        ContextLimits {
            max_age: config.context_max_age,
            max_count: config.context_limit,
        },
    );

    let monitored = MonitoredChannels::new(config.monitored_channel.map(ChannelId::new));
    if let Some(channel_id) = config.monitored_channel {
        info!("Monitoring channel {channel_id} for auto-search");
    }

    let data = Data {
        assistant,
        monitored,
        settings: BotSettings {
            command_prefix: config.command_prefix.clone(),
            auto_search_min_length: config.auto_search_min_length,
            max_response_length: config.max_response_length,
            chunk_size: config.chunk_size,
        },
    };

    debug!("Setting up gateway intents");
    let intents = GatewayIntents::non_privileged() | GatewayIntents::MESSAGE_CONTENT;

    debug!("Building framework");
    let framework = Framework::builder()
        .options(FrameworkOptions {
            commands: all_commands(),
            prefix_options: PrefixFrameworkOptions {
                prefix: Some(config.command_prefix.clone()),
                ..Default::default()
            },
            on_error: |error| Box::pin(on_error(error)),
            event_handler: |ctx, event, _framework, data| Box::pin(event_handler(ctx, event, data)),
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                info!("Bot is ready and connected to Discord");
                debug!("Registering commands globally");
                builtins::register_globally(ctx, &framework.options().commands).await?;
                info!("Commands registered successfully");
                Ok(data)
            })
        })
        .build();

    debug!("Creating Discord client");
    let mut client = ClientBuilder::new(&config.discord_token, intents)
        .framework(framework)
        .await?;

    info!("Starting Discord client");

    tokio::select! {
        result = client.start() => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received, shutting down...");
        }
    }

    Ok(())
}

async fn event_handler(ctx: &Context, event: &FullEvent, data: &Data) -> Result<()> {
    if let FullEvent::Message { new_message } = event
        && new_message.author.id != ctx.cache.current_user().id
    {
        handle_auto_search(ctx, new_message, data).await?;
    }
    Ok(())
}

async fn on_error(error: FrameworkError<'_, Data, BotError>) {
    match error {
        FrameworkError::Command { error, ctx, .. } => {
            error!("Command '{}' failed: {error}", ctx.command().name);
            if let Err(e) = ctx.say(error.user_message()).await {
                warn!("Failed to report command error: {e}");
            }
        }
        FrameworkError::MissingUserPermissions { ctx, .. } => {
            if let Err(e) = ctx
                .say("❌ You don't have permission to use this command.")
                .await
            {
                warn!("Failed to report missing permissions: {e}");
            }
        }
        FrameworkError::UnknownCommand { .. } => {}
        other => {
            if let Err(e) = builtins::on_error(other).await {
                error!("Error while handling error: {e}");
            }
        }
    }
}
