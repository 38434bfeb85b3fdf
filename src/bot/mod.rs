//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the investigation bot,
//! including all slash commands, the message-scanning event handler, and
//! bot context management.

/// Command permission checks
pub mod checks;
/// Discord command implementations (config, bullets, prefixes, general)
pub mod commands;
/// Discord gateway event handlers
pub mod handlers;

use crate::config::app::AppConfig;
use crate::errors::{Error, Result};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use tracing::{error, info};

/// Embed color used across the bot's messages.
pub(crate) const EMBED_COLOR: u32 = 0x00D9_2C43;

/// Shared data available to all bot commands.
/// This structure holds the database connection and any other global state
/// that commands need to access.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
}

impl BotData {
    /// Creates a new `BotData` instance with the given database connection.
    #[must_use]
    pub const fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }
}

/// Converts a Discord snowflake to its stored form. Snowflakes fit in i64
/// (42 timestamp bits plus worker and sequence bits).
#[allow(clippy::cast_possible_wrap)]
pub(crate) const fn id_to_db(id: u64) -> i64 {
    id as i64
}

/// Converts a stored id back to a Discord snowflake.
#[allow(clippy::cast_sign_loss)]
pub(crate) const fn db_to_id(id: i64) -> u64 {
    id as u64
}

/// The guild a command was invoked in, in stored form.
pub(crate) fn guild_db_id(ctx: poise::Context<'_, BotData, Error>) -> Result<i64> {
    ctx.guild_id()
        .map(|id| id_to_db(id.get()))
        .ok_or_else(|| Error::InvalidInput {
            message: "This command can only be used in a server.".to_string(),
        })
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            #[allow(clippy::panic)]
            {
                panic!("Failed to start bot: {error:?}");
            }
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx.say(format!("An error occurred: {error}")).await {
                error!("Failed to send error message: {e}");
            }
        }
        poise::FrameworkError::CommandCheckFailed { error, ctx, .. } => {
            let message = error.map_or_else(
                || "You aren't allowed to use this command.".to_string(),
                |e| e.to_string(),
            );
            if let Err(e) = ctx.say(message).await {
                error!("Failed to send permission message: {e}");
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {e}");
            }
        }
    }
}

/// Builds the poise framework and runs the gateway client until it exits.
///
/// # Errors
/// Returns an error if the client cannot be built or the gateway connection
/// fails terminally.
pub async fn run_bot(
    token: String,
    app_config: &AppConfig,
    database: DatabaseConnection,
) -> Result<()> {
    let dev_guild = app_config.dev_guild_id;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::ping(),
                commands::about(),
                commands::support(),
                commands::bullet_config(),
                commands::bullet_permissions(),
                commands::truth_bullets(),
                commands::prefixes(),
            ],
            event_handler: |ctx, event, framework, data| {
                Box::pin(handlers::handle_event(ctx, event, framework, data))
            },
            prefix_options: poise::PrefixFrameworkOptions {
                dynamic_prefix: Some(|ctx| Box::pin(handlers::dynamic_prefix(ctx))),
                ..Default::default()
            },
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                if let Some(guild_id) = dev_guild {
                    let guild_id = serenity::GuildId::new(guild_id);
                    poise::builtins::register_in_guild(
                        ctx,
                        &framework.options().commands,
                        guild_id,
                    )
                    .await?;
                    info!("Registered commands in guild {guild_id}");
                } else {
                    info!("Registering commands globally...");
                    poise::builtins::register_globally(ctx, &framework.options().commands)
                        .await?;
                }
                Ok(BotData::new(database))
            })
        })
        .build();

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::ClientBuilder::new(&token, intents)
        .framework(framework)
        .await?;

    client.start().await.map_err(Into::into)
}
