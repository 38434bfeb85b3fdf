//! Guild configuration entity - per-server Truth Bullet settings.
//!
//! One row per Discord server, lazily created with defaults the first time
//! the server is referenced. Role and channel columns use `0` for "unset",
//! matching how the config commands render them.

use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Guild configuration database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "guild_configs")]
pub struct Model {
    /// Discord guild id, used directly as the primary key
    #[sea_orm(primary_key, auto_increment = false)]
    pub guild_id: i64,
    /// Whether messages are scanned for Truth Bullets
    pub bullets_enabled: bool,
    /// Role whose members can find Truth Bullets (0 = unset)
    pub player_role: i64,
    /// Role granted to the Best Detective(s) on completion (0 = unset)
    pub ult_detective_role: i64,
    /// Channel found bullets are announced in (0 = unset)
    pub bullet_chan_id: i64,
    /// Whether Manage Server permissions suffice to manage Truth Bullets
    pub bullet_default_perms_check: bool,
    /// Extra roles allowed to manage Truth Bullets
    #[sea_orm(column_type = "Json")]
    pub bullet_custom_perm_roles: IdSet,
    /// Command prefixes for this server, bounded to [`MAX_PREFIXES`]
    #[sea_orm(column_type = "Json")]
    pub prefixes: PrefixSet,
}

/// `GuildConfig` relates to Truth Bullets by guild id value only; no foreign
/// key is declared so bullets and configs can be created independently.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Upper bound on stored command prefixes per server.
pub const MAX_PREFIXES: usize = 10;

/// A set of Discord ids stored as a JSON column.
///
/// Insertion order is preserved; membership is unique.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult,
)]
pub struct IdSet(Vec<i64>);

impl IdSet {
    /// Whether the id is present.
    #[must_use]
    pub fn contains(&self, id: i64) -> bool {
        self.0.contains(&id)
    }

    /// Adds the id; returns `false` if it was already present.
    pub fn insert(&mut self, id: i64) -> bool {
        if self.contains(id) {
            return false;
        }
        self.0.push(id);
        true
    }

    /// Removes the id; returns `false` if it was not present.
    pub fn remove(&mut self, id: i64) -> bool {
        let before = self.0.len();
        self.0.retain(|&existing| existing != id);
        self.0.len() != before
    }

    /// Iterates the ids in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.0.iter().copied()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A set of command-prefix strings stored as a JSON column.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult,
)]
pub struct PrefixSet(Vec<String>);

impl PrefixSet {
    /// Whether the prefix is present.
    #[must_use]
    pub fn contains(&self, prefix: &str) -> bool {
        self.0.iter().any(|existing| existing == prefix)
    }

    /// Adds the prefix; returns `false` if it was already present.
    pub fn insert(&mut self, prefix: String) -> bool {
        if self.contains(&prefix) {
            return false;
        }
        self.0.push(prefix);
        true
    }

    /// Removes the prefix; returns `false` if it was not present.
    pub fn remove(&mut self, prefix: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|existing| existing != prefix);
        self.0.len() != before
    }

    /// The oldest configured prefix, served to the prefix-command framework.
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Iterates the prefixes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of stored prefixes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_set_insert_is_unique() {
        let mut set = IdSet::default();
        assert!(set.insert(1));
        assert!(set.insert(2));
        assert!(!set.insert(1));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_id_set_remove_missing() {
        let mut set = IdSet::default();
        assert!(set.insert(7));
        assert!(set.remove(7));
        assert!(!set.remove(7));
        assert!(set.is_empty());
    }

    #[test]
    fn test_prefix_set_preserves_insertion_order() {
        let mut set = PrefixSet::default();
        assert!(set.insert("!".to_string()));
        assert!(set.insert("?".to_string()));
        assert!(!set.insert("!".to_string()));
        assert_eq!(set.first(), Some("!"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_prefix_set_remove() {
        let mut set = PrefixSet::default();
        assert!(set.insert("!".to_string()));
        assert!(set.remove("!"));
        assert!(!set.remove("!"));
        assert_eq!(set.first(), None);
    }
}
