//! Core business logic - framework-agnostic investigation operations.
//!
//! Nothing in this layer touches the Discord SDK; it works on plain ids and
//! entity models so the scanning and completion rules can be tested against
//! an in-memory database.

/// Per-guild configuration access and mutation
pub mod guild_config;
/// Completion detection and Best Detective tallying
pub mod leaderboard;
/// Message qualification and Truth Bullet matching
pub mod scanner;
/// Truth Bullet repository operations, including the atomic claim
pub mod truth_bullet;
