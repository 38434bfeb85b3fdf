//! Truth Bullet management commands.
//!
//! Planting, inspecting, aliasing, and removing the clues themselves. All of
//! these are gated by the "may manage Truth Bullets" capability; the
//! found-transition is never performed here, only by the scanner.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, EMBED_COLOR, guild_db_id, id_to_db},
        core::truth_bullet,
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use serenity::Mentionable;

    /// The base command for managing Truth Bullets.
    #[poise::command(
        slash_command,
        guild_only,
        subcommands(
            "bullet_add",
            "bullet_remove",
            "bullet_list",
            "bullet_info",
            "alias"
        )
    )]
    pub async fn truth_bullets(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Use one of the subcommands: `add`, `remove`, `list`, `info`, `alias`.")
            .await?;
        Ok(())
    }

    /// Adds a Truth Bullet to a channel.
    #[poise::command(
        slash_command,
        guild_only,
        rename = "add",
        check = "crate::bot::checks::can_manage_bullets"
    )]
    pub async fn bullet_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "The channel the Truth Bullet can be found in"]
        #[channel_types("Text")]
        channel: serenity::GuildChannel,
        #[description = "The keyword players must mention"] name: String,
        #[description = "The clue text shown when it is found"] description: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let bullet = truth_bullet::create_bullet(
            db,
            guild_db_id(ctx)?,
            id_to_db(channel.id.get()),
            name,
            description,
        )
        .await?;

        ctx.say(format!(
            "Truth Bullet `{}` added to {}!",
            bullet.name,
            channel.mention()
        ))
        .await?;
        Ok(())
    }

    /// Removes a Truth Bullet from a channel.
    #[poise::command(
        slash_command,
        guild_only,
        rename = "remove",
        check = "crate::bot::checks::can_manage_bullets"
    )]
    pub async fn bullet_remove(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "The channel the Truth Bullet lives in"]
        #[channel_types("Text")]
        channel: serenity::GuildChannel,
        #[description = "The Truth Bullet's name"] name: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        truth_bullet::delete_bullet(db, guild_db_id(ctx)?, id_to_db(channel.id.get()), &name)
            .await?;

        ctx.say(format!("Truth Bullet `{name}` removed!")).await?;
        Ok(())
    }

    /// Lists the Truth Bullets in a channel.
    #[poise::command(
        slash_command,
        guild_only,
        rename = "list",
        check = "crate::bot::checks::can_manage_bullets"
    )]
    pub async fn bullet_list(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "The channel to list"]
        #[channel_types("Text")]
        channel: serenity::GuildChannel,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let bullets = truth_bullet::bullets_for_channel(
            db,
            guild_db_id(ctx)?,
            id_to_db(channel.id.get()),
        )
        .await?;

        if bullets.is_empty() {
            ctx.say(format!(
                "There are no Truth Bullets in {}.",
                channel.mention()
            ))
            .await?;
            return Ok(());
        }

        let lines: Vec<String> = bullets
            .iter()
            .map(|bullet| match bullet.finder {
                Some(finder) if bullet.found => {
                    format!("`{}` (found by <@{finder}>)", bullet.name)
                }
                _ => format!("`{}`", bullet.name),
            })
            .collect();

        let embed = serenity::CreateEmbed::default()
            .title(format!("Truth Bullets for #{}", channel.name))
            .description(lines.join("\n"))
            .color(EMBED_COLOR);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Shows everything about one Truth Bullet.
    #[poise::command(
        slash_command,
        guild_only,
        rename = "info",
        check = "crate::bot::checks::can_manage_bullets"
    )]
    pub async fn bullet_info(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "The channel the Truth Bullet lives in"]
        #[channel_types("Text")]
        channel: serenity::GuildChannel,
        #[description = "The Truth Bullet's name or an alias"] name: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let bullet =
            truth_bullet::find_by_name(db, guild_db_id(ctx)?, id_to_db(channel.id.get()), &name)
                .await?
                .ok_or(Error::BulletNotFound { name })?;

        let aliases = if bullet.aliases.is_empty() {
            "None".to_string()
        } else {
            bullet
                .aliases
                .iter()
                .map(|alias| format!("`{alias}`"))
                .collect::<Vec<_>>()
                .join(", ")
        };
        let found = match bullet.finder {
            Some(finder) if bullet.found => format!("Yes, by <@{finder}>"),
            _ => "No".to_string(),
        };

        let embed = serenity::CreateEmbed::default()
            .title(bullet.name)
            .description(bullet.description)
            .color(EMBED_COLOR)
            .field("Aliases", aliases, false)
            .field("Found", found, false);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// The base command for managing a Truth Bullet's aliases.
    #[poise::command(slash_command, guild_only, subcommands("alias_add", "alias_remove"))]
    pub async fn alias(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Use one of the subcommands: `add`, `remove`.").await?;
        Ok(())
    }

    /// Adds an alternate name a Truth Bullet can be found by.
    #[poise::command(
        slash_command,
        guild_only,
        rename = "add",
        check = "crate::bot::checks::can_manage_bullets"
    )]
    pub async fn alias_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "The channel the Truth Bullet lives in"]
        #[channel_types("Text")]
        channel: serenity::GuildChannel,
        #[description = "The Truth Bullet's name"] name: String,
        #[description = "The alias to add"] alias: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let bullet = truth_bullet::add_alias(
            db,
            guild_db_id(ctx)?,
            id_to_db(channel.id.get()),
            &name,
            alias.clone(),
        )
        .await?;

        ctx.say(format!(
            "`{}` can now also be found as `{alias}`!",
            bullet.name
        ))
        .await?;
        Ok(())
    }

    /// Removes an alias from a Truth Bullet.
    #[poise::command(
        slash_command,
        guild_only,
        rename = "remove",
        check = "crate::bot::checks::can_manage_bullets"
    )]
    pub async fn alias_remove(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "The channel the Truth Bullet lives in"]
        #[channel_types("Text")]
        channel: serenity::GuildChannel,
        #[description = "The Truth Bullet's name"] name: String,
        #[description = "The alias to remove"] alias: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let bullet = truth_bullet::remove_alias(
            db,
            guild_db_id(ctx)?,
            id_to_db(channel.id.get()),
            &name,
            &alias,
        )
        .await?;

        ctx.say(format!(
            "`{}` no longer answers to `{alias}`.",
            bullet.name
        ))
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
