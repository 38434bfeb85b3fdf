//! Message scanning - the Truth Bullet discovery and completion flow.
//!
//! Every guild message runs through here: cheap rejects first, then one
//! config read whose snapshot is passed through the rest of the handler,
//! then match, claim, announce, and (after the last bullet) completion.
//! The claim persists before any send, so a failed announcement can never
//! leave a bullet found in memory but unpersisted.

use crate::bot::{BotData, EMBED_COLOR, db_to_id, id_to_db};
use crate::core::{guild_config, leaderboard, scanner, truth_bullet};
use crate::entities::{GuildConfigModel, TruthBulletModel};
use crate::errors::{Error, Result};
use poise::serenity_prelude as serenity;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Pause between successive role grants, to stay clear of rate limits.
const ROLE_GRANT_DELAY: Duration = Duration::from_secs(1);

/// Entry point for message-create events.
///
/// Configuration errors are the server staff's to fix, so they are reported
/// as a reply on the triggering message; anything else propagates to the
/// top-level error report.
pub async fn handle_message(
    ctx: &serenity::Context,
    message: &serenity::Message,
    data: &BotData,
) -> Result<()> {
    match scan_message(ctx, message, data).await {
        Ok(()) => Ok(()),
        Err(Error::Config { message: why }) => {
            message.reply(ctx, why).await?;
            Ok(())
        }
        Err(other) => Err(other),
    }
}

async fn scan_message(
    ctx: &serenity::Context,
    message: &serenity::Message,
    data: &BotData,
) -> Result<()> {
    let db = &data.database;

    let Some(guild_id) = message.guild_id else {
        return Ok(());
    };

    // Cheap rejects before touching the database
    if message.author.bot
        || message.author.system
        || message.kind != serenity::MessageType::Regular
        || message.content.is_empty()
    {
        return Ok(());
    }

    // One config read per message; everything below works on this snapshot
    let config = guild_config::get_or_create(db, id_to_db(guild_id.get())).await?;
    if !config.bullets_enabled || config.player_role <= 0 {
        return Ok(());
    }

    let snapshot = message_context(ctx, message, guild_id).await?;
    if !scanner::message_qualifies(&snapshot, &config) {
        return Ok(());
    }

    let Some(bullet) =
        scanner::find_unfound_match(db, snapshot.channel_id, &snapshot.content).await?
    else {
        return Ok(());
    };

    // Resolve the announcement channel before consuming the bullet, so a
    // misconfigured channel is reported without eating a claim
    let bullet_chan = resolve_bullet_channel(ctx, &config)?;

    if !truth_bullet::claim(db, bullet.id, snapshot.author_id).await? {
        // A concurrent message claimed this bullet first
        return Ok(());
    }

    info!(
        guild_id = config.guild_id,
        bullet = %bullet.name,
        finder = snapshot.author_id,
        "Truth Bullet found"
    );

    let embed = found_embed(&bullet, message.author.display_name());
    message
        .channel_id
        .send_message(
            &ctx.http,
            serenity::CreateMessage::new()
                .reference_message(message)
                .embed(embed.clone()),
        )
        .await?;
    bullet_chan
        .send_message(&ctx.http, serenity::CreateMessage::new().embed(embed))
        .await?;

    if let Some(results) = leaderboard::check_completion(db, config.guild_id).await? {
        finish_investigation(ctx, data, guild_id, bullet_chan, config, &results).await?;
    }

    Ok(())
}

/// Builds the scanner's view of a message, resolving threads to their
/// parent channel.
async fn message_context(
    ctx: &serenity::Context,
    message: &serenity::Message,
    guild_id: serenity::GuildId,
) -> Result<scanner::MessageContext> {
    let channel = message.channel(ctx).await?;
    let effective_channel = match &channel {
        serenity::Channel::Guild(chan) if chan.thread_metadata.is_some() => {
            chan.parent_id.unwrap_or(message.channel_id)
        }
        _ => message.channel_id,
    };

    let author_roles = message
        .member
        .as_deref()
        .map(|member| {
            member
                .roles
                .iter()
                .map(|role| id_to_db(role.get()))
                .collect()
        })
        .unwrap_or_default();

    Ok(scanner::MessageContext {
        guild_id: Some(id_to_db(guild_id.get())),
        channel_id: id_to_db(effective_channel.get()),
        author_id: id_to_db(message.author.id.get()),
        author_is_bot: message.author.bot,
        author_is_system: message.author.system,
        author_roles,
        is_default_message: message.kind == serenity::MessageType::Regular,
        content: message.content.clone(),
    })
}

/// Resolves the configured announcement channel, requiring the bot to
/// actually see it.
fn resolve_bullet_channel(
    ctx: &serenity::Context,
    config: &GuildConfigModel,
) -> Result<serenity::ChannelId> {
    let unresolvable = || Error::Config {
        message: "For some reason, I tried getting a channel I can't see. The staff of \
                  this server should be able to fix this soon."
            .to_string(),
    };

    if config.bullet_chan_id <= 0 {
        return Err(unresolvable());
    }

    let channel_id = serenity::ChannelId::new(db_to_id(config.bullet_chan_id));
    if ctx.cache.channel(channel_id).is_none() {
        return Err(unresolvable());
    }

    Ok(channel_id)
}

/// Embed announcing a found bullet, used both for the reply and the bullet
/// channel post.
fn found_embed(bullet: &TruthBulletModel, finder_name: &str) -> serenity::CreateEmbed {
    serenity::CreateEmbed::default()
        .title(format!("{} found!", bullet.name))
        .description(&bullet.description)
        .color(EMBED_COLOR)
        .footer(serenity::CreateEmbedFooter::new(format!(
            "Found by {finder_name}"
        )))
}

/// Completion Action Runner: grants the Best Detective role to each winner,
/// announces the results, and disables scanning.
///
/// Grants run serially with a fixed delay; a failed grant only costs that
/// winner the role and never stops the loop or the announcement.
async fn finish_investigation(
    ctx: &serenity::Context,
    data: &BotData,
    guild_id: serenity::GuildId,
    bullet_chan: serenity::ChannelId,
    config: GuildConfigModel,
    results: &leaderboard::Leaderboard,
) -> Result<()> {
    if config.ult_detective_role > 0 {
        let role_id = serenity::RoleId::new(db_to_id(config.ult_detective_role));
        let role_exists = ctx
            .cache
            .guild(guild_id)
            .is_some_and(|guild| guild.roles.contains_key(&role_id));

        if role_exists {
            for &winner in &results.winners {
                let user_id = serenity::UserId::new(db_to_id(winner));
                if let Err(source) = ctx
                    .http
                    .add_member_role(guild_id, user_id, role_id, Some("Best Detective"))
                    .await
                {
                    warn!(%user_id, error = %source, "Failed to grant the Best Detective role");
                }
                sleep(ROLE_GRANT_DELAY).await;
            }
        }
    }

    bullet_chan
        .say(&ctx.http, leaderboard::completion_message(results))
        .await?;

    guild_config::set_bullets_enabled(&data.database, config, false).await?;
    info!(
        guild_id = guild_id.get(),
        "Investigation complete; scanning disabled"
    );

    Ok(())
}
