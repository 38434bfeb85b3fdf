//! Truth Bullet configuration commands.
//!
//! `/bullet_config` covers the per-server investigation settings and is
//! gated by the "may manage Truth Bullets" capability; `/bullet_permissions`
//! decides who holds that capability and is gated by Manage Server.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, EMBED_COLOR, guild_db_id, id_to_db},
        core::guild_config,
        entities::GuildConfigModel,
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use serenity::Mentionable;

    fn toggle_friendly(enabled: bool) -> &'static str {
        if enabled { "on" } else { "off" }
    }

    fn manager_list(config: &GuildConfigModel) -> String {
        let mut entries = Vec::new();
        if config.bullet_default_perms_check {
            entries.push("Members with `Manage Server` permissions".to_string());
        }
        entries.extend(
            config
                .bullet_custom_perm_roles
                .iter()
                .map(|role_id| format!("<@&{role_id}>")),
        );

        format!("Can Manage Truth Bullets: {}", entries.join(", "))
    }

    /// The base command for the server's Truth Bullet settings.
    #[poise::command(
        slash_command,
        guild_only,
        subcommands(
            "config_show",
            "config_channel",
            "config_player_role",
            "config_best_detective_role",
            "config_toggle",
            "config_enable",
            "config_disable",
        )
    )]
    pub async fn bullet_config(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Use one of the subcommands: `show`, `channel`, `player_role`, `best_detective_role`, `toggle`, `enable`, `disable`.")
            .await?;
        Ok(())
    }

    /// Lists out the Truth Bullet configuration settings for the server.
    #[poise::command(
        slash_command,
        guild_only,
        rename = "show",
        check = "crate::bot::checks::can_manage_bullets"
    )]
    pub async fn config_show(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let config = guild_config::get_or_create(db, guild_db_id(ctx)?).await?;

        let str_builder = [
            format!(
                "Truth Bullets: {}",
                toggle_friendly(config.bullets_enabled)
            ),
            format!(
                "Truth Bullet channel: {}",
                if config.bullet_chan_id > 0 {
                    format!("<#{}>", config.bullet_chan_id)
                } else {
                    "None".to_string()
                }
            ),
            String::new(),
            format!(
                "Player role: {}",
                if config.player_role > 0 {
                    format!("<@&{}>", config.player_role)
                } else {
                    "None".to_string()
                }
            ),
            format!(
                "Best Detective role: {}",
                if config.ult_detective_role > 0 {
                    format!("<@&{}>", config.ult_detective_role)
                } else {
                    "None".to_string()
                }
            ),
            manager_list(&config),
        ];

        let guild_name = ctx
            .guild()
            .map_or_else(|| "this server".to_string(), |guild| guild.name.clone());

        let embed = serenity::CreateEmbed::default()
            .title(format!("Server config for {guild_name}"))
            .description(str_builder.join("\n"))
            .color(EMBED_COLOR);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Sets where all Truth Bullets are sent to (alongside the channel they
    /// were found in).
    #[poise::command(
        slash_command,
        guild_only,
        rename = "channel",
        check = "crate::bot::checks::can_manage_bullets"
    )]
    pub async fn config_channel(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "The channel found Truth Bullets are announced in"]
        #[channel_types("Text")]
        channel: serenity::GuildChannel,
    ) -> Result<()> {
        let db = &ctx.data().database;
        guild_config::set_bullet_channel(db, guild_db_id(ctx)?, id_to_db(channel.id.get()))
            .await?;

        ctx.say(format!(
            "Truth Bullet channel set to {}!",
            channel.mention()
        ))
        .await?;
        Ok(())
    }

    /// Sets the Player role. Only members with the Player role can find
    /// Truth Bullets.
    #[poise::command(
        slash_command,
        guild_only,
        rename = "player_role",
        check = "crate::bot::checks::can_manage_bullets"
    )]
    pub async fn config_player_role(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "The role whose members can find Truth Bullets"] role: serenity::Role,
    ) -> Result<()> {
        let db = &ctx.data().database;
        guild_config::set_player_role(db, guild_db_id(ctx)?, id_to_db(role.id.get())).await?;

        ctx.say(format!("Player role set to {}!", role.mention()))
            .await?;
        Ok(())
    }

    /// Sets (or, with no role given, unsets) the Best Detective role.
    ///
    /// The role handed to whoever found the most Truth Bullets.
    #[poise::command(
        slash_command,
        guild_only,
        rename = "best_detective_role",
        check = "crate::bot::checks::can_manage_bullets"
    )]
    pub async fn config_best_detective_role(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "The role to grant; omit to unset"] role: Option<serenity::Role>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let role_id = role.as_ref().map_or(0, |role| id_to_db(role.id.get()));
        guild_config::set_ult_detective_role(db, guild_db_id(ctx)?, role_id).await?;

        match role {
            Some(role) => {
                ctx.say(format!("Best Detective role set to {}!", role.mention()))
                    .await?;
            }
            None => {
                ctx.say("Best Detective role unset!").await?;
            }
        }
        Ok(())
    }

    /// Turns the Truth Bullets on or off, depending on what they were earlier.
    ///
    /// Turning them on requires the Player role and the Truth
    /// Bullets channel to be set.
    #[poise::command(
        slash_command,
        guild_only,
        rename = "toggle",
        check = "crate::bot::checks::can_manage_bullets"
    )]
    pub async fn config_toggle(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let config = guild_config::get_or_create(db, guild_db_id(ctx)?).await?;

        let enable = !config.bullets_enabled;
        let config = guild_config::set_bullets_enabled(db, config, enable).await?;

        ctx.say(format!(
            "Truth Bullets turned {}!",
            toggle_friendly(config.bullets_enabled)
        ))
        .await?;
        Ok(())
    }

    /// Turns on the Truth Bullets. Requires the Player role and the Truth
    /// Bullets channel to be set.
    #[poise::command(
        slash_command,
        guild_only,
        rename = "enable",
        check = "crate::bot::checks::can_manage_bullets"
    )]
    pub async fn config_enable(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let config = guild_config::get_or_create(db, guild_db_id(ctx)?).await?;
        guild_config::set_bullets_enabled(db, config, true).await?;

        ctx.say("Truth Bullets enabled!").await?;
        Ok(())
    }

    /// Turns off the Truth Bullets.
    ///
    /// This also happens automatically after
    /// all Truth Bullets have been found.
    #[poise::command(
        slash_command,
        guild_only,
        rename = "disable",
        check = "crate::bot::checks::can_manage_bullets"
    )]
    pub async fn config_disable(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let config = guild_config::get_or_create(db, guild_db_id(ctx)?).await?;
        guild_config::set_bullets_enabled(db, config, false).await?;

        ctx.say("Truth Bullets disabled!").await?;
        Ok(())
    }

    /// The base command for determining who can Manage Truth Bullets.
    #[poise::command(
        slash_command,
        guild_only,
        subcommands("perms_show", "perms_default", "perms_add", "perms_remove")
    )]
    pub async fn bullet_permissions(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Use one of the subcommands: `show`, `default`, `add`, `remove`.")
            .await?;
        Ok(())
    }

    /// Lists who can Manage Truth Bullets on this server.
    #[poise::command(
        slash_command,
        guild_only,
        rename = "show",
        check = "crate::bot::checks::has_manage_guild"
    )]
    pub async fn perms_show(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let config = guild_config::get_or_create(db, guild_db_id(ctx)?).await?;

        ctx.say(manager_list(&config)).await?;
        Ok(())
    }

    /// Toggles whether people with Manage Server permissions can Manage
    /// Truth Bullets.
    #[poise::command(
        slash_command,
        guild_only,
        rename = "default",
        check = "crate::bot::checks::has_manage_guild"
    )]
    pub async fn perms_default(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Whether Manage Server permissions suffice"] toggle: bool,
    ) -> Result<()> {
        let db = &ctx.data().database;
        guild_config::set_default_perms_check(db, guild_db_id(ctx)?, toggle).await?;

        let toggle_str = if toggle { "can" } else { "cannot" };
        ctx.say(format!(
            "People with Manage Server permissions now {toggle_str} use Truth Bullet commands."
        ))
        .await?;
        Ok(())
    }

    /// Adds a role to the roles that can Manage Truth Bullets.
    #[poise::command(
        slash_command,
        guild_only,
        rename = "add",
        check = "crate::bot::checks::has_manage_guild"
    )]
    pub async fn perms_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "The role to allow"] role: serenity::Role,
    ) -> Result<()> {
        let db = &ctx.data().database;
        guild_config::add_perm_role(db, guild_db_id(ctx)?, id_to_db(role.id.get())).await?;

        ctx.say(format!("{} can now Manage Truth Bullets.", role.mention()))
            .await?;
        Ok(())
    }

    /// Removes a role from the roles that can Manage Truth Bullets.
    #[poise::command(
        slash_command,
        guild_only,
        rename = "remove",
        check = "crate::bot::checks::has_manage_guild"
    )]
    pub async fn perms_remove(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "The role to disallow"] role: serenity::Role,
    ) -> Result<()> {
        let db = &ctx.data().database;
        guild_config::remove_perm_role(db, guild_db_id(ctx)?, id_to_db(role.id.get())).await?;

        ctx.say(format!(
            "{} can no longer Manage Truth Bullets.",
            role.mention()
        ))
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
