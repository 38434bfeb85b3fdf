//! Truth Bullet entity - a keyword-tagged clue scoped to a guild channel.
//!
//! A bullet is matched case-insensitively against message text by its name
//! or any alias. Once found it records its finder and becomes terminal: the
//! scanner never transitions it again.

use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Truth Bullet database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "truth_bullets")]
pub struct Model {
    /// Unique identifier; ascending id is the matching order
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Guild this bullet belongs to
    pub guild_id: i64,
    /// Channel the bullet can be found in
    pub channel_id: i64,
    /// Canonical keyword, matched case-insensitively as a substring
    pub name: String,
    /// Alternate keywords, same matching rule
    #[sea_orm(column_type = "Json")]
    pub aliases: AliasSet,
    /// Clue text shown when the bullet is found
    pub description: String,
    /// Whether the bullet has been found (false→true only)
    pub found: bool,
    /// Who found it; set exactly when `found` flips true
    pub finder: Option<i64>,
}

/// Bullets relate to guild configs by guild id value only.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Maximum number of aliases per bullet.
pub const MAX_ALIASES: usize = 5;
/// Maximum length of a single alias, in characters.
pub const MAX_ALIAS_LEN: usize = 40;

/// A set of alias strings stored as a JSON column.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult,
)]
pub struct AliasSet(Vec<String>);

impl AliasSet {
    /// Whether the alias is present (case-insensitive).
    #[must_use]
    pub fn contains(&self, alias: &str) -> bool {
        self.0.iter().any(|existing| existing.eq_ignore_ascii_case(alias))
    }

    /// Adds the alias; returns `false` if it was already present.
    pub fn insert(&mut self, alias: String) -> bool {
        if self.contains(&alias) {
            return false;
        }
        self.0.push(alias);
        true
    }

    /// Removes the alias (case-insensitive); returns `false` if absent.
    pub fn remove(&mut self, alias: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|existing| !existing.eq_ignore_ascii_case(alias));
        self.0.len() != before
    }

    /// Iterates the aliases in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of stored aliases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no aliases.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
