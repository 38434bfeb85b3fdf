//! Guild configuration business logic.
//!
//! Provides the lazily-created per-guild config record and the mutations
//! behind the config commands. All functions are async and return Result
//! types for error handling.

use crate::{
    entities::{GuildConfig, guild_config},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*};

/// Fetches the configuration for a guild, creating it with defaults on
/// first reference.
///
/// Two concurrent handlers may race to create the row; the losing insert
/// re-reads the winner's row so both observe the same record.
pub async fn get_or_create(db: &DatabaseConnection, guild_id: i64) -> Result<guild_config::Model> {
    if let Some(config) = GuildConfig::find_by_id(guild_id).one(db).await? {
        return Ok(config);
    }

    let fresh = guild_config::ActiveModel {
        guild_id: Set(guild_id),
        bullets_enabled: Set(false),
        player_role: Set(0),
        ult_detective_role: Set(0),
        bullet_chan_id: Set(0),
        bullet_default_perms_check: Set(true),
        bullet_custom_perm_roles: Set(guild_config::IdSet::default()),
        prefixes: Set(guild_config::PrefixSet::default()),
    };

    match fresh.insert(db).await {
        Ok(config) => Ok(config),
        Err(insert_err) => GuildConfig::find_by_id(guild_id)
            .one(db)
            .await?
            .ok_or_else(|| Error::Database(insert_err)),
    }
}

/// Sets the channel found bullets are announced in.
pub async fn set_bullet_channel(
    db: &DatabaseConnection,
    guild_id: i64,
    channel_id: i64,
) -> Result<guild_config::Model> {
    let mut config: guild_config::ActiveModel = get_or_create(db, guild_id).await?.into();
    config.bullet_chan_id = Set(channel_id);
    config.update(db).await.map_err(Into::into)
}

/// Sets the Player role.
pub async fn set_player_role(
    db: &DatabaseConnection,
    guild_id: i64,
    role_id: i64,
) -> Result<guild_config::Model> {
    let mut config: guild_config::ActiveModel = get_or_create(db, guild_id).await?.into();
    config.player_role = Set(role_id);
    config.update(db).await.map_err(Into::into)
}

/// Sets (role id) or unsets (0) the Best Detective role.
pub async fn set_ult_detective_role(
    db: &DatabaseConnection,
    guild_id: i64,
    role_id: i64,
) -> Result<guild_config::Model> {
    let mut config: guild_config::ActiveModel = get_or_create(db, guild_id).await?.into();
    config.ult_detective_role = Set(role_id);
    config.update(db).await.map_err(Into::into)
}

/// Validates that a guild is ready for bullets to be enabled.
///
/// # Errors
/// Returns a configuration error naming the missing setting.
pub fn validate_enable(config: &guild_config::Model) -> Result<()> {
    if config.player_role <= 0 {
        return Err(Error::Config {
            message: "You still need to set the Player role for this server!".to_string(),
        });
    }
    if config.bullet_chan_id <= 0 {
        return Err(Error::Config {
            message: "You still need to set a Truth Bullets channel!".to_string(),
        });
    }
    Ok(())
}

/// Turns scanning on or off.
///
/// Enabling requires the Player role and the bullet channel to be set;
/// disabling is always allowed (the completion runner uses it).
pub async fn set_bullets_enabled(
    db: &DatabaseConnection,
    config: guild_config::Model,
    enabled: bool,
) -> Result<guild_config::Model> {
    if enabled {
        validate_enable(&config)?;
    }

    let mut active: guild_config::ActiveModel = config.into();
    active.bullets_enabled = Set(enabled);
    active.update(db).await.map_err(Into::into)
}

/// Toggles whether Manage Server permissions suffice to manage bullets.
pub async fn set_default_perms_check(
    db: &DatabaseConnection,
    guild_id: i64,
    toggle: bool,
) -> Result<guild_config::Model> {
    let mut config: guild_config::ActiveModel = get_or_create(db, guild_id).await?.into();
    config.bullet_default_perms_check = Set(toggle);
    config.update(db).await.map_err(Into::into)
}

/// Adds a role to the custom Truth Bullet manager roles.
///
/// # Errors
/// Returns an input error if the role is already in the set.
pub async fn add_perm_role(
    db: &DatabaseConnection,
    guild_id: i64,
    role_id: i64,
) -> Result<guild_config::Model> {
    let config = get_or_create(db, guild_id).await?;

    let mut roles = config.bullet_custom_perm_roles.clone();
    if !roles.insert(role_id) {
        return Err(Error::InvalidInput {
            message: "This role is already allowed to Manage Truth Bullets!".to_string(),
        });
    }

    let mut active: guild_config::ActiveModel = config.into();
    active.bullet_custom_perm_roles = Set(roles);
    active.update(db).await.map_err(Into::into)
}

/// Removes a role from the custom Truth Bullet manager roles.
///
/// # Errors
/// Returns an input error if the role is not in the set.
pub async fn remove_perm_role(
    db: &DatabaseConnection,
    guild_id: i64,
    role_id: i64,
) -> Result<guild_config::Model> {
    let config = get_or_create(db, guild_id).await?;

    let mut roles = config.bullet_custom_perm_roles.clone();
    if !roles.remove(role_id) {
        return Err(Error::InvalidInput {
            message: "This role is already not allowed to Manage Truth Bullets!".to_string(),
        });
    }

    let mut active: guild_config::ActiveModel = config.into();
    active.bullet_custom_perm_roles = Set(roles);
    active.update(db).await.map_err(Into::into)
}

/// Adds a command prefix for the guild.
///
/// # Errors
/// Returns an input error for empty prefixes, duplicates, or when the cap of
/// [`guild_config::MAX_PREFIXES`] is reached.
pub async fn add_prefix(
    db: &DatabaseConnection,
    guild_id: i64,
    prefix: String,
) -> Result<guild_config::Model> {
    if prefix.is_empty() {
        return Err(Error::InvalidInput {
            message: "This is an empty string! I cannot use this.".to_string(),
        });
    }

    let config = get_or_create(db, guild_id).await?;

    let mut prefixes = config.prefixes.clone();
    if prefixes.len() >= guild_config::MAX_PREFIXES {
        return Err(Error::InvalidInput {
            message: format!(
                "You have too many prefixes! You can only have up to {} prefixes.",
                guild_config::MAX_PREFIXES
            ),
        });
    }
    if !prefixes.insert(prefix) {
        return Err(Error::InvalidInput {
            message: "The server already has this prefix!".to_string(),
        });
    }

    let mut active: guild_config::ActiveModel = config.into();
    active.prefixes = Set(prefixes);
    active.update(db).await.map_err(Into::into)
}

/// Removes a command prefix from the guild.
///
/// # Errors
/// Returns an input error if the prefix was never configured.
pub async fn remove_prefix(
    db: &DatabaseConnection,
    guild_id: i64,
    prefix: &str,
) -> Result<guild_config::Model> {
    let config = get_or_create(db, guild_id).await?;

    let mut prefixes = config.prefixes.clone();
    if !prefixes.remove(prefix) {
        return Err(Error::InvalidInput {
            message: "The server doesn't have that prefix, so I can't delete it!".to_string(),
        });
    }

    let mut active: guild_config::ActiveModel = config.into();
    active.prefixes = Set(prefixes);
    active.update(db).await.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    const GUILD: i64 = 100;

    #[tokio::test]
    async fn test_get_or_create_defaults() -> Result<()> {
        let db = setup_test_db().await?;

        let config = get_or_create(&db, GUILD).await?;

        assert_eq!(config.guild_id, GUILD);
        assert!(!config.bullets_enabled);
        assert_eq!(config.player_role, 0);
        assert_eq!(config.ult_detective_role, 0);
        assert_eq!(config.bullet_chan_id, 0);
        assert!(config.bullet_default_perms_check);
        assert!(config.bullet_custom_perm_roles.is_empty());
        assert!(config.prefixes.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_get_or_create_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;

        let first = get_or_create(&db, GUILD).await?;
        let updated = set_player_role(&db, GUILD, 42).await?;
        let second = get_or_create(&db, GUILD).await?;

        assert_eq!(first.guild_id, second.guild_id);
        assert_eq!(updated, second);

        Ok(())
    }

    #[tokio::test]
    async fn test_enable_requires_player_role_and_channel() -> Result<()> {
        let db = setup_test_db().await?;

        let config = get_or_create(&db, GUILD).await?;
        let result = set_bullets_enabled(&db, config, true).await;
        assert!(matches!(result.unwrap_err(), Error::Config { .. }));

        // Player role alone is not enough
        let config = set_player_role(&db, GUILD, 42).await?;
        let result = set_bullets_enabled(&db, config, true).await;
        assert!(matches!(result.unwrap_err(), Error::Config { .. }));

        // With both set, enabling works
        let config = set_bullet_channel(&db, GUILD, 7).await?;
        let config = set_bullets_enabled(&db, config, true).await?;
        assert!(config.bullets_enabled);

        Ok(())
    }

    #[tokio::test]
    async fn test_disable_is_always_allowed() -> Result<()> {
        let db = setup_test_db().await?;

        // Disabling works even on a guild with nothing configured
        let config = get_or_create(&db, GUILD).await?;
        let config = set_bullets_enabled(&db, config, false).await?;
        assert!(!config.bullets_enabled);

        Ok(())
    }

    #[tokio::test]
    async fn test_unset_best_detective_role() -> Result<()> {
        let db = setup_test_db().await?;

        let config = set_ult_detective_role(&db, GUILD, 55).await?;
        assert_eq!(config.ult_detective_role, 55);

        let config = set_ult_detective_role(&db, GUILD, 0).await?;
        assert_eq!(config.ult_detective_role, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_perm_role_duplicate_and_missing() -> Result<()> {
        let db = setup_test_db().await?;

        let config = add_perm_role(&db, GUILD, 9).await?;
        assert!(config.bullet_custom_perm_roles.contains(9));

        let result = add_perm_role(&db, GUILD, 9).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidInput { .. }));

        let config = remove_perm_role(&db, GUILD, 9).await?;
        assert!(!config.bullet_custom_perm_roles.contains(9));

        let result = remove_perm_role(&db, GUILD, 9).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidInput { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_prefix_bound() -> Result<()> {
        let db = setup_test_db().await?;

        for i in 0..guild_config::MAX_PREFIXES {
            add_prefix(&db, GUILD, format!("p{i}")).await?;
        }

        let result = add_prefix(&db, GUILD, "one-too-many".to_string()).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidInput { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_prefix_duplicate_and_missing() -> Result<()> {
        let db = setup_test_db().await?;

        add_prefix(&db, GUILD, "!".to_string()).await?;
        let result = add_prefix(&db, GUILD, "!".to_string()).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidInput { .. }));

        let result = add_prefix(&db, GUILD, String::new()).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidInput { .. }));

        remove_prefix(&db, GUILD, "!").await?;
        let result = remove_prefix(&db, GUILD, "!").await;
        assert!(matches!(result.unwrap_err(), Error::InvalidInput { .. }));

        Ok(())
    }
}
