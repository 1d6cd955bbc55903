use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use chrono::TimeDelta;
use log::{debug, error, info};

use crate::error::{BotError, Result};

const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";

/// Sampling parameters forwarded with every completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.8,
            top_k: 40,
            max_tokens: 2048,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub openrouter_api_key: String,
    pub openrouter_model: String,
    pub generation: GenerationConfig,
    pub command_prefix: String,
    pub monitored_channel: Option<u64>,
    pub auto_search_min_length: usize,
    pub context_max_age: TimeDelta,
    pub context_limit: usize,
    pub database_path: PathBuf,
    pub max_response_length: usize,
    pub chunk_size: usize,
    pub retention: TimeDelta,
    pub search_pacing: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        debug!("Loading configuration from environment");
        dotenvy::dotenv().ok();

        let discord_token = env::var("DISCORD_TOKEN").map_err(|e| {
            error!("Failed to load DISCORD_TOKEN from environment: {e}");
            e
        })?;

        let openrouter_api_key = env::var("OPENROUTER_API_KEY").map_err(|e| {
            error!("Failed to load OPENROUTER_API_KEY from environment: {e}");
            e
        })?;

        let openrouter_model =
            env::var("OPENROUTER_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let defaults = GenerationConfig::default();
        let generation = GenerationConfig {
            temperature: parse_or("TEMPERATURE", defaults.temperature)?,
            top_p: parse_or("TOP_P", defaults.top_p)?,
            top_k: parse_or("TOP_K", defaults.top_k)?,
            max_tokens: parse_or("MAX_OUTPUT_TOKENS", defaults.max_tokens)?,
        };

        let monitored_channel: Option<u64> = match env::var("CHANNEL_ID") {
            Ok(raw) if !raw.trim().is_empty() => Some(parse_value("CHANNEL_ID", &raw)?),
            _ => None,
        };
        if monitored_channel == Some(0) {
            return Err(BotError::Config("CHANNEL_ID must not be 0".to_string()));
        }

        let context_hours: i64 = parse_or("CONTEXT_HOURS", 24)?;
        let context_max_age = age_window("CONTEXT_HOURS", context_hours, TimeDelta::try_hours)?;

        let cleanup_days: i64 = parse_or("CLEANUP_DAYS", 30)?;
        let retention = age_window("CLEANUP_DAYS", cleanup_days, TimeDelta::try_days)?;

        let config = Self {
            discord_token,
            openrouter_api_key,
            openrouter_model,
            generation,
            command_prefix: env::var("COMMAND_PREFIX").unwrap_or_else(|_| "!".to_string()),
            monitored_channel,
            auto_search_min_length: parse_or("AUTO_SEARCH_MIN_LENGTH", 10)?,
            context_max_age,
            context_limit: parse_or("CONTEXT_LIMIT", 5)?,
            database_path: env::var("DATABASE_PATH")
                .map_or_else(|_| PathBuf::from("conversation_memory.db"), PathBuf::from),
            max_response_length: parse_or("MAX_RESPONSE_LENGTH", 2000)?,
            chunk_size: parse_or("CHUNK_SIZE", 1900)?,
            retention,
            search_pacing: Duration::from_millis(parse_or("SEARCH_PACING_MS", 500)?),
        };

        if config.chunk_size == 0 {
            return Err(BotError::Config("CHUNK_SIZE must be positive".to_string()));
        }

        info!("Configuration loaded successfully");
        debug!("Discord token length: {} characters", config.discord_token.len());
        debug!(
            "OpenRouter API key length: {} characters",
            config.openrouter_api_key.len()
        );
        debug!("OpenRouter model: {}", config.openrouter_model);
        debug!("Database path: {}", config.database_path.display());
        debug!(
            "Context window: {} turns within {context_hours} hours",
            config.context_limit
        );
        debug!("Retention: {cleanup_days} days");

        Ok(config)
    }
}

/// Reads an optional variable, falling back to `default` when unset.
fn parse_or<T: FromStr>(key: &str, default: T) -> Result<T> {
    match env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

/// Converts a positive count of `key` units into a window.
fn age_window(
    key: &str,
    value: i64,
    to_delta: fn(i64) -> Option<TimeDelta>,
) -> Result<TimeDelta> {
    if value <= 0 {
        return Err(BotError::Config(format!("{key} must be positive, got {value}")));
    }
    to_delta(value).ok_or_else(|| BotError::Config(format!("{key} is out of range")))
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim().parse().map_err(|_| {
        error!("Invalid value for {key}: {raw:?}");
        BotError::Config(format!("{key} has an invalid value: {raw:?}"))
    })
}
