//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{core::truth_bullet, entities, errors::Result};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates an unfound test bullet with a placeholder description.
pub async fn create_test_bullet(
    db: &DatabaseConnection,
    guild_id: i64,
    channel_id: i64,
    name: &str,
) -> Result<entities::truth_bullet::Model> {
    truth_bullet::create_bullet(
        db,
        guild_id,
        channel_id,
        name.to_string(),
        format!("Description for {name}"),
    )
    .await
}
