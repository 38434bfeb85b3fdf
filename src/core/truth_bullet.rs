//! Truth Bullet repository operations.
//!
//! Provides creation, lookup, alias management, deletion, and the atomic
//! claim that performs the one legal found-transition. Queries that feed the
//! matching loop are ordered by ascending id so first-match-wins is
//! insertion order, deterministically.

use crate::{
    entities::{TruthBullet, truth_bullet},
    errors::{Error, Result},
};
use sea_orm::sea_query::Expr;
use sea_orm::{PaginatorTrait, QueryOrder, Set, prelude::*};

/// Maximum length of a bullet name, in characters.
pub const MAX_NAME_LEN: usize = 100;

/// Creates an unfound Truth Bullet in the given channel.
///
/// # Errors
/// Returns an input error for an empty or over-long name, or when the name
/// collides with an existing bullet's name or alias in the channel.
pub async fn create_bullet(
    db: &DatabaseConnection,
    guild_id: i64,
    channel_id: i64,
    name: String,
    description: String,
) -> Result<truth_bullet::Model> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(Error::InvalidInput {
            message: "Truth Bullet names cannot be empty".to_string(),
        });
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(Error::InvalidInput {
            message: format!("Truth Bullet names are capped at {MAX_NAME_LEN} characters"),
        });
    }

    if find_by_name(db, guild_id, channel_id, &name).await?.is_some() {
        return Err(Error::InvalidInput {
            message: format!("A Truth Bullet named `{name}` already exists in that channel!"),
        });
    }

    let bullet = truth_bullet::ActiveModel {
        guild_id: Set(guild_id),
        channel_id: Set(channel_id),
        name: Set(name),
        aliases: Set(truth_bullet::AliasSet::default()),
        description: Set(description),
        found: Set(false),
        finder: Set(None),
        ..Default::default()
    };

    bullet.insert(db).await.map_err(Into::into)
}

/// Finds a bullet in a channel whose name or any alias equals `name`
/// (case-insensitive, exact match - not the substring scan).
pub async fn find_by_name(
    db: &DatabaseConnection,
    guild_id: i64,
    channel_id: i64,
    name: &str,
) -> Result<Option<truth_bullet::Model>> {
    let bullets = bullets_for_channel(db, guild_id, channel_id).await?;
    Ok(bullets
        .into_iter()
        .find(|b| b.name.eq_ignore_ascii_case(name) || b.aliases.contains(name)))
}

/// All bullets in a channel, in insertion order.
pub async fn bullets_for_channel(
    db: &DatabaseConnection,
    guild_id: i64,
    channel_id: i64,
) -> Result<Vec<truth_bullet::Model>> {
    TruthBullet::find()
        .filter(truth_bullet::Column::GuildId.eq(guild_id))
        .filter(truth_bullet::Column::ChannelId.eq(channel_id))
        .order_by_asc(truth_bullet::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Unfound bullets in a channel, in insertion order. This is the scanner's
/// matching pool.
pub async fn unfound_in_channel(
    db: &DatabaseConnection,
    channel_id: i64,
) -> Result<Vec<truth_bullet::Model>> {
    TruthBullet::find()
        .filter(truth_bullet::Column::ChannelId.eq(channel_id))
        .filter(truth_bullet::Column::Found.eq(false))
        .order_by_asc(truth_bullet::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Whether any unfound bullet remains in the guild.
pub async fn unfound_remaining(db: &DatabaseConnection, guild_id: i64) -> Result<bool> {
    let count = TruthBullet::find()
        .filter(truth_bullet::Column::GuildId.eq(guild_id))
        .filter(truth_bullet::Column::Found.eq(false))
        .count(db)
        .await?;
    Ok(count > 0)
}

/// All bullets in the guild, in insertion order.
pub async fn all_for_guild(
    db: &DatabaseConnection,
    guild_id: i64,
) -> Result<Vec<truth_bullet::Model>> {
    TruthBullet::find()
        .filter(truth_bullet::Column::GuildId.eq(guild_id))
        .order_by_asc(truth_bullet::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Atomically claims a bullet for a finder.
///
/// The update is conditioned on the bullet still being unfound, so exactly
/// one of any set of racing handlers wins: `rows_affected` tells the caller
/// whether it was this one. The losing caller must treat the bullet as
/// already found and do nothing.
pub async fn claim<C: ConnectionTrait>(db: &C, bullet_id: i64, finder: i64) -> Result<bool> {
    let result = TruthBullet::update_many()
        .col_expr(truth_bullet::Column::Found, Expr::value(true))
        .col_expr(truth_bullet::Column::Finder, Expr::value(finder))
        .filter(truth_bullet::Column::Id.eq(bullet_id))
        .filter(truth_bullet::Column::Found.eq(false))
        .exec(db)
        .await?;

    Ok(result.rows_affected == 1)
}

/// Adds an alias to a bullet.
///
/// # Errors
/// Returns an input error when the alias is empty, over-long, duplicates the
/// bullet's name or an existing alias, or the alias cap is reached; a
/// not-found error when no bullet matches `name`.
pub async fn add_alias(
    db: &DatabaseConnection,
    guild_id: i64,
    channel_id: i64,
    name: &str,
    alias: String,
) -> Result<truth_bullet::Model> {
    let alias = alias.trim().to_string();
    if alias.is_empty() {
        return Err(Error::InvalidInput {
            message: "Aliases cannot be empty".to_string(),
        });
    }
    if alias.chars().count() > truth_bullet::MAX_ALIAS_LEN {
        return Err(Error::InvalidInput {
            message: format!(
                "Aliases are capped at {} characters",
                truth_bullet::MAX_ALIAS_LEN
            ),
        });
    }

    let bullet = find_by_name(db, guild_id, channel_id, name)
        .await?
        .ok_or_else(|| Error::BulletNotFound {
            name: name.to_string(),
        })?;

    if bullet.aliases.len() >= truth_bullet::MAX_ALIASES {
        return Err(Error::InvalidInput {
            message: format!(
                "A Truth Bullet can only have up to {} aliases!",
                truth_bullet::MAX_ALIASES
            ),
        });
    }

    let mut aliases = bullet.aliases.clone();
    if bullet.name.eq_ignore_ascii_case(&alias) || !aliases.insert(alias) {
        return Err(Error::InvalidInput {
            message: "This Truth Bullet already responds to that name!".to_string(),
        });
    }

    let mut active: truth_bullet::ActiveModel = bullet.into();
    active.aliases = Set(aliases);
    active.update(db).await.map_err(Into::into)
}

/// Removes an alias from a bullet.
///
/// # Errors
/// Returns an input error when the alias is not present; a not-found error
/// when no bullet matches `name`.
pub async fn remove_alias(
    db: &DatabaseConnection,
    guild_id: i64,
    channel_id: i64,
    name: &str,
    alias: &str,
) -> Result<truth_bullet::Model> {
    let bullet = find_by_name(db, guild_id, channel_id, name)
        .await?
        .ok_or_else(|| Error::BulletNotFound {
            name: name.to_string(),
        })?;

    let mut aliases = bullet.aliases.clone();
    if !aliases.remove(alias) {
        return Err(Error::InvalidInput {
            message: "This Truth Bullet does not have that alias!".to_string(),
        });
    }

    let mut active: truth_bullet::ActiveModel = bullet.into();
    active.aliases = Set(aliases);
    active.update(db).await.map_err(Into::into)
}

/// Deletes a bullet by name.
///
/// # Errors
/// Returns a not-found error when no bullet matches `name`.
pub async fn delete_bullet(
    db: &DatabaseConnection,
    guild_id: i64,
    channel_id: i64,
    name: &str,
) -> Result<()> {
    let bullet = find_by_name(db, guild_id, channel_id, name)
        .await?
        .ok_or_else(|| Error::BulletNotFound {
            name: name.to_string(),
        })?;

    bullet.delete(db).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    const GUILD: i64 = 100;
    const CHANNEL: i64 = 200;

    #[tokio::test]
    async fn test_create_bullet_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let result =
            create_bullet(&db, GUILD, CHANNEL, "   ".to_string(), "desc".to_string()).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidInput { .. }));

        let result =
            create_bullet(&db, GUILD, CHANNEL, "x".repeat(MAX_NAME_LEN + 1), String::new()).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidInput { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_bullet_rejects_duplicates() -> Result<()> {
        let db = setup_test_db().await?;

        create_test_bullet(&db, GUILD, CHANNEL, "knife").await?;

        // Same name, different casing
        let result =
            create_bullet(&db, GUILD, CHANNEL, "KNIFE".to_string(), String::new()).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidInput { .. }));

        // Clashing with an alias is also a duplicate
        add_alias(&db, GUILD, CHANNEL, "knife", "blade".to_string()).await?;
        let result =
            create_bullet(&db, GUILD, CHANNEL, "Blade".to_string(), String::new()).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidInput { .. }));

        // Same name in a different channel is fine
        let other = create_bullet(
            &db,
            GUILD,
            CHANNEL + 1,
            "knife".to_string(),
            String::new(),
        )
        .await?;
        assert_eq!(other.channel_id, CHANNEL + 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_find_by_name_matches_aliases() -> Result<()> {
        let db = setup_test_db().await?;

        let bullet = create_test_bullet(&db, GUILD, CHANNEL, "knife").await?;
        add_alias(&db, GUILD, CHANNEL, "knife", "blade".to_string()).await?;

        let by_name = find_by_name(&db, GUILD, CHANNEL, "Knife").await?.unwrap();
        assert_eq!(by_name.id, bullet.id);

        let by_alias = find_by_name(&db, GUILD, CHANNEL, "BLADE").await?.unwrap();
        assert_eq!(by_alias.id, bullet.id);

        assert!(find_by_name(&db, GUILD, CHANNEL, "rope").await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_claim_is_atomic_and_terminal() -> Result<()> {
        let db = setup_test_db().await?;

        let bullet = create_test_bullet(&db, GUILD, CHANNEL, "knife").await?;

        assert!(claim(&db, bullet.id, 111).await?);

        // A second claim loses the race and must not change the finder
        assert!(!claim(&db, bullet.id, 222).await?);

        let stored = TruthBullet::find_by_id(bullet.id).one(&db).await?.unwrap();
        assert!(stored.found);
        assert_eq!(stored.finder, Some(111));

        Ok(())
    }

    #[tokio::test]
    async fn test_claimed_bullet_leaves_matching_pool() -> Result<()> {
        let db = setup_test_db().await?;

        let bullet = create_test_bullet(&db, GUILD, CHANNEL, "knife").await?;
        create_test_bullet(&db, GUILD, CHANNEL, "key").await?;

        claim(&db, bullet.id, 111).await?;

        let pool = unfound_in_channel(&db, CHANNEL).await?;
        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].name, "key");

        Ok(())
    }

    #[tokio::test]
    async fn test_unfound_remaining() -> Result<()> {
        let db = setup_test_db().await?;

        let first = create_test_bullet(&db, GUILD, CHANNEL, "knife").await?;
        let second = create_test_bullet(&db, GUILD, CHANNEL, "key").await?;

        assert!(unfound_remaining(&db, GUILD).await?);

        claim(&db, first.id, 111).await?;
        assert!(unfound_remaining(&db, GUILD).await?);

        claim(&db, second.id, 222).await?;
        assert!(!unfound_remaining(&db, GUILD).await?);

        Ok(())
    }

    #[tokio::test]
    async fn test_alias_cap() -> Result<()> {
        let db = setup_test_db().await?;

        create_test_bullet(&db, GUILD, CHANNEL, "knife").await?;
        for i in 0..truth_bullet::MAX_ALIASES {
            add_alias(&db, GUILD, CHANNEL, "knife", format!("alias{i}")).await?;
        }

        let result = add_alias(&db, GUILD, CHANNEL, "knife", "overflow".to_string()).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidInput { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_alias_validation() -> Result<()> {
        let db = setup_test_db().await?;

        create_test_bullet(&db, GUILD, CHANNEL, "knife").await?;

        let result = add_alias(&db, GUILD, CHANNEL, "knife", "  ".to_string()).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidInput { .. }));

        let result = add_alias(
            &db,
            GUILD,
            CHANNEL,
            "knife",
            "x".repeat(truth_bullet::MAX_ALIAS_LEN + 1),
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::InvalidInput { .. }));

        // Alias equal to the bullet's own name
        let result = add_alias(&db, GUILD, CHANNEL, "knife", "Knife".to_string()).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidInput { .. }));

        let result = add_alias(&db, GUILD, CHANNEL, "rope", "cord".to_string()).await;
        assert!(matches!(result.unwrap_err(), Error::BulletNotFound { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_remove_alias() -> Result<()> {
        let db = setup_test_db().await?;

        create_test_bullet(&db, GUILD, CHANNEL, "knife").await?;
        add_alias(&db, GUILD, CHANNEL, "knife", "blade".to_string()).await?;

        let bullet = remove_alias(&db, GUILD, CHANNEL, "knife", "Blade").await?;
        assert!(bullet.aliases.is_empty());

        let result = remove_alias(&db, GUILD, CHANNEL, "knife", "blade").await;
        assert!(matches!(result.unwrap_err(), Error::InvalidInput { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_bullet() -> Result<()> {
        let db = setup_test_db().await?;

        create_test_bullet(&db, GUILD, CHANNEL, "knife").await?;
        delete_bullet(&db, GUILD, CHANNEL, "knife").await?;

        assert!(find_by_name(&db, GUILD, CHANNEL, "knife").await?.is_none());

        let result = delete_bullet(&db, GUILD, CHANNEL, "knife").await;
        assert!(matches!(result.unwrap_err(), Error::BulletNotFound { .. }));

        Ok(())
    }
}
