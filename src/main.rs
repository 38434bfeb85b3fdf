//! Binary entry point: wires configuration, the database, and the bot.

use dotenvy::dotenv;
use std::env;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use ultimate_investigator::{bot, config, errors::Result};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (non-fatal, env vars can be set externally)
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the application configuration
    let app_config = config::app::load_default_config()
        .inspect_err(|e| error!("Failed to load application configuration: {e}"))?;

    // 4. Initialize the database
    let db = config::database::create_connection(&app_config)
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to the database: {e}"))?;
    config::database::create_tables(&db)
        .await
        .inspect(|_| info!("Database tables ready."))
        .inspect_err(|e| error!("Failed to create database tables: {e}"))?;

    // 5. Run the bot. The token is loaded directly before use, not stored
    // in the app config.
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {e}"))?;

    bot::run_bot(token, &app_config, db).await
}
