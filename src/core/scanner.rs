//! Bullet Scanner - decides whether a message can trigger discovery and
//! finds the bullet it discovers.
//!
//! The scanner works on a [`MessageContext`] snapshot instead of an SDK
//! message type, so the qualification rules and the matching loop can be
//! tested without a gateway. The bot layer builds the snapshot (including
//! resolving a thread to its parent channel) and performs the sends.

use crate::{
    core::truth_bullet,
    entities::{guild_config, truth_bullet as truth_bullet_entity},
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Framework-agnostic snapshot of an inbound message.
#[derive(Debug, Clone)]
pub struct MessageContext {
    /// Guild the message was sent in; `None` for DMs
    pub guild_id: Option<i64>,
    /// Effective channel for matching: a thread's parent channel id, or the
    /// message's own channel id
    pub channel_id: i64,
    /// Message author
    pub author_id: i64,
    /// Whether the author is a bot account
    pub author_is_bot: bool,
    /// Whether the author is a Discord system account
    pub author_is_system: bool,
    /// Roles the author holds in the guild
    pub author_roles: Vec<i64>,
    /// Whether this is a plain content message (not a reply, pin notice, ...)
    pub is_default_message: bool,
    /// Raw text content
    pub content: String,
}

/// Whether a message may trigger bullet discovery at all.
///
/// Rejects automated and system authors, non-guild messages, non-default
/// message types, and empty content; then requires scanning to be enabled,
/// a Player role to be configured, and the author to hold it.
#[must_use]
pub fn message_qualifies(message: &MessageContext, config: &guild_config::Model) -> bool {
    if message.author_is_bot
        || message.author_is_system
        || message.guild_id.is_none()
        || !message.is_default_message
        || message.content.is_empty()
    {
        return false;
    }

    config.bullets_enabled
        && config.player_role > 0
        && message.author_roles.contains(&config.player_role)
}

/// Whether a bullet's name or any alias appears in the content.
/// `content_lower` must already be lowercased.
fn bullet_matches(bullet: &truth_bullet_entity::Model, content_lower: &str) -> bool {
    content_lower.contains(&bullet.name.to_lowercase())
        || bullet
            .aliases
            .iter()
            .any(|alias| content_lower.contains(&alias.to_lowercase()))
}

/// Finds the first unfound bullet in the channel mentioned by `content`.
///
/// "First" is insertion order (ascending id). Matching is case-insensitive
/// substring containment over the name and every alias; there is no scoring
/// and no longest-match preference.
pub async fn find_unfound_match(
    db: &DatabaseConnection,
    channel_id: i64,
    content: &str,
) -> Result<Option<truth_bullet_entity::Model>> {
    let content_lower = content.to_lowercase();
    let bullets = truth_bullet::unfound_in_channel(db, channel_id).await?;

    Ok(bullets
        .into_iter()
        .find(|bullet| bullet_matches(bullet, &content_lower)))
}
