//! Application settings loading from config.toml
//!
//! This module provides functionality to load optional app-level settings
//! from a TOML configuration file. Everything here has a sensible default,
//! so a missing config.toml is not an error; the environment always wins
//! over the file.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Database URL override; `DATABASE_URL` in the environment wins
    pub database_url: Option<String>,
    /// Guild to register slash commands in during development; commands are
    /// registered globally when unset
    pub dev_guild_id: Option<u64>,
}

/// Loads app settings from a TOML file.
///
/// A missing file yields the defaults; a present-but-invalid file is a
/// configuration error.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads app settings from the default location (./config.toml).
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_default_config() -> Result<AppConfig> {
    load_config("config.toml")
}
