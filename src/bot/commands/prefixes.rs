//! Command-prefix management.
//!
//! Each server can keep a small set of text-command prefixes; the oldest one
//! is served to the prefix framework, and mentioning the bot always works.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, guild_db_id},
        core::guild_config,
        errors::{Error, Result},
    };

    /// The base command for this server's command prefixes.
    #[poise::command(
        slash_command,
        guild_only,
        subcommands("prefix_show", "prefix_add", "prefix_remove")
    )]
    pub async fn prefixes(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Use one of the subcommands: `show`, `add`, `remove`.")
            .await?;
        Ok(())
    }

    /// Shows all of the prefixes for this server.
    #[poise::command(slash_command, guild_only, rename = "show")]
    pub async fn prefix_show(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let config = guild_config::get_or_create(db, guild_db_id(ctx)?).await?;

        if config.prefixes.is_empty() {
            ctx.say("I have no prefixes on this server, but you can mention me to run a command.")
                .await?;
        } else {
            let listed = config
                .prefixes
                .iter()
                .map(|prefix| format!("`{prefix}`"))
                .collect::<Vec<_>>()
                .join(", ");
            ctx.say(format!(
                "My prefixes for this server are: {listed}, but you can also mention me."
            ))
            .await?;
        }
        Ok(())
    }

    /// Adds a prefix for this server.
    #[poise::command(
        slash_command,
        guild_only,
        rename = "add",
        check = "crate::bot::checks::has_manage_guild"
    )]
    pub async fn prefix_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "The prefix to add"] prefix: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        guild_config::add_prefix(db, guild_db_id(ctx)?, prefix.clone()).await?;

        ctx.say(format!("Added `{prefix}`!")).await?;
        Ok(())
    }

    /// Deletes a prefix from this server. The prefix must have existed in
    /// the first place.
    #[poise::command(
        slash_command,
        guild_only,
        rename = "remove",
        check = "crate::bot::checks::has_manage_guild"
    )]
    pub async fn prefix_remove(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "The prefix to remove"] prefix: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        guild_config::remove_prefix(db, guild_db_id(ctx)?, &prefix).await?;

        ctx.say(format!("Removed `{prefix}`!")).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
