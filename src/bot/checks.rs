//! Command permission checks.
//!
//! Commands that mutate investigation state are gated by one of two checks:
//! the broad "may manage Truth Bullets" capability, or plain Manage Server
//! for the permission-management commands themselves. Member permissions
//! come from the interaction payload, so no extra HTTP request is made.

use crate::bot::{BotData, id_to_db};
use crate::core::guild_config;
use crate::errors::{Error, Result};

/// Whether the invoker may manage Truth Bullets: Manage Server (when the
/// server lets that suffice) or any of the configured manager roles.
pub async fn can_manage_bullets(ctx: poise::Context<'_, BotData, Error>) -> Result<bool> {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(false);
    };
    let Some(member) = ctx.author_member().await else {
        return Ok(false);
    };

    let config =
        guild_config::get_or_create(&ctx.data().database, id_to_db(guild_id.get())).await?;

    if config.bullet_default_perms_check
        && member.permissions.is_some_and(|perms| perms.manage_guild())
    {
        return Ok(true);
    }

    Ok(member
        .roles
        .iter()
        .any(|role| config.bullet_custom_perm_roles.contains(id_to_db(role.get()))))
}

/// Whether the invoker has Manage Server permissions.
pub async fn has_manage_guild(ctx: poise::Context<'_, BotData, Error>) -> Result<bool> {
    let Some(member) = ctx.author_member().await else {
        return Ok(false);
    };
    Ok(member.permissions.is_some_and(|perms| perms.manage_guild()))
}
