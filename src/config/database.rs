//! Database configuration module.
//!
//! This module handles `SQLite` database connection and table creation using
//! `SeaORM`. It uses `SeaORM`'s `Schema::create_table_from_entity` method to
//! generate SQL statements from the entity models, ensuring the database
//! schema matches the Rust struct definitions without manual SQL.

use crate::config::app::AppConfig;
use crate::entities::{GuildConfig, TruthBullet};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Resolves the database URL: `DATABASE_URL` from the environment, then the
/// config.toml override, then a default local `SQLite` file.
#[must_use]
pub fn get_database_url(app_config: &AppConfig) -> String {
    std::env::var("DATABASE_URL")
        .ok()
        .or_else(|| app_config.database_url.clone())
        .unwrap_or_else(|| "sqlite://data/investigator.sqlite".to_string())
}

/// Establishes a connection to the database resolved by [`get_database_url`].
///
/// # Errors
/// Returns an error if the connection cannot be established.
pub async fn create_connection(app_config: &AppConfig) -> Result<DatabaseConnection> {
    let database_url = get_database_url(app_config);

    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates all necessary database tables from the entity definitions.
///
/// Table creation is skipped for tables that already exist, so this is safe
/// to run on every startup.
///
/// # Errors
/// Returns an error if a create-table statement fails.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let guild_config_table = schema
        .create_table_from_entity(GuildConfig)
        .if_not_exists()
        .to_owned();
    let truth_bullet_table = schema
        .create_table_from_entity(TruthBullet)
        .if_not_exists()
        .to_owned();

    db.execute(builder.build(&guild_config_table)).await?;
    db.execute(builder.build(&truth_bullet_table)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{GuildConfigModel, TruthBulletModel};
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<GuildConfigModel> = GuildConfig::find().limit(1).all(&db).await?;
        let _: Vec<TruthBulletModel> = TruthBullet::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;

        let _: Vec<GuildConfigModel> = GuildConfig::find().limit(1).all(&db).await?;

        Ok(())
    }
}
