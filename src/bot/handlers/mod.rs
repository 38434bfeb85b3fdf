//! Discord gateway event handlers.

/// Message scanning and investigation completion
pub mod message;

use crate::bot::{BotData, id_to_db};
use crate::core;
use crate::errors::{Error, Result};
use poise::serenity_prelude as serenity;
use tracing::info;

/// Routes gateway events to their handlers.
///
/// # Errors
/// Propagates handler errors to poise's `on_error` hook, which logs them.
pub async fn handle_event(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, BotData, Error>,
    data: &BotData,
) -> Result<()> {
    match event {
        serenity::FullEvent::Ready { data_about_bot } => {
            info!("Connected as {}", data_about_bot.user.name);
        }
        serenity::FullEvent::Message { new_message } => {
            message::handle_message(ctx, new_message, data).await?;
        }
        _ => {}
    }
    Ok(())
}

/// Serves the guild's oldest configured prefix to the prefix framework.
/// Mentioning the bot always works as a prefix regardless.
///
/// # Errors
/// Returns an error if the guild configuration cannot be read.
pub async fn dynamic_prefix(
    ctx: poise::PartialContext<'_, BotData, Error>,
) -> Result<Option<String>> {
    let Some(guild_id) = ctx.guild_id else {
        return Ok(None);
    };

    let config =
        core::guild_config::get_or_create(&ctx.data.database, id_to_db(guild_id.get())).await?;
    Ok(config.prefixes.first().map(ToOwned::to_owned))
}
