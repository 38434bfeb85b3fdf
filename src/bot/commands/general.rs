//! General Discord commands - ping, about, and support.
//! This module contains simple commands that don't require database
//! operations and provide basic bot functionality.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, EMBED_COLOR},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    /// Responds with "Pong!" to test bot connectivity.
    ///
    /// This is a simple health check command that doesn't require any database operations.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Gives information about the bot.
    #[poise::command(slash_command, prefix_command)]
    pub async fn about(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let description = "Hi! I'm a bot meant to help out with investigations in \
            Danganronpa-style RPs.\n\
            Plant Truth Bullets in your channels, hand out the Player role, and I'll \
            watch for anyone mentioning a clue. Once every Truth Bullet has been \
            found, I tally the scores and crown the Best Detective(s).\n\n\
            Use `/bullet_config` to set up your server and `/truth_bullets` to plant \
            the clues.";

        let about_embed = serenity::CreateEmbed::default()
            .title("About")
            .description(description)
            .color(EMBED_COLOR);

        ctx.send(poise::CreateReply::default().embed(about_embed))
            .await?;
        Ok(())
    }

    /// Points at where to get help with the bot.
    #[poise::command(slash_command, prefix_command)]
    pub async fn support(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say(
            "Questions, or found broken behavior? Open an issue on the project's \
             repository page.",
        )
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
