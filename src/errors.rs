//! Unified error types and result handling.
//!
//! Every fallible operation in the crate returns [`Result`]. Database and
//! Discord API failures convert into [`Error`] via `From`, so handlers and
//! commands can propagate with `?` throughout.

use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// A server is misconfigured in a way that blocks the requested action,
    /// e.g. the Truth Bullet channel resolves to nothing the bot can see.
    /// Surfaced to the user rather than swallowed.
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description, shown to the invoking user
        message: String,
    },

    /// A command argument failed validation (duplicate name, over-long
    /// alias, prefix cap, ...). Surfaced as the command reply.
    #[error("{message}")]
    InvalidInput {
        /// Human-readable description, shown to the invoking user
        message: String,
    },

    /// A Truth Bullet lookup by name found nothing in the given channel.
    #[error("No Truth Bullet named `{name}` exists in that channel")]
    BulletNotFound {
        /// The name or alias that was searched for
        name: String,
    },

    /// Unexpected persistence failure. Propagates to the top-level error
    /// report; never silently dropped.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error, e.g. while reading `config.toml`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required environment variable is missing or malformed.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Serenity/Poise framework or Discord API error.
    #[error("Discord API error: {0}")]
    Serenity(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Serenity(Box::new(value))
    }
}

/// Convenience `Result` type used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
