//! Discord command implementations organized by category.

/// Truth Bullet server configuration and permission commands
pub mod bullet_config;
/// Truth Bullet management commands
pub mod bullets;
/// General utility commands
pub mod general;
/// Command-prefix management commands
pub mod prefixes;

// Export commands
pub use bullet_config::*;
pub use bullets::*;
pub use general::*;
pub use prefixes::*;
