//! Completion Detector - decides when an investigation ends and who won.
//!
//! An investigation completes when zero unfound bullets remain in the guild.
//! The leaderboard counts found bullets per finder over all bullets in the
//! guild; everyone tied at the maximum is a Best Detective.

use crate::{core::truth_bullet, entities::truth_bullet as truth_bullet_entity, errors::Result};
use sea_orm::DatabaseConnection;
use std::collections::HashMap;

/// The winners of a completed investigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaderboard {
    /// Highest per-finder found-count
    pub max_found: usize,
    /// Finders tied at the maximum, ascending for deterministic output
    pub winners: Vec<i64>,
}

/// Tallies found-counts per finder and collects the tie set at the maximum.
///
/// Returns `None` when no bullet has a finder, which can only happen for a
/// guild with no bullets at all; the handler never reaches completion in
/// that state.
#[must_use]
pub fn tally(bullets: &[truth_bullet_entity::Model]) -> Option<Leaderboard> {
    let mut counts: HashMap<i64, usize> = HashMap::new();
    for bullet in bullets {
        if let Some(finder) = bullet.finder {
            *counts.entry(finder).or_insert(0) += 1;
        }
    }

    let max_found = counts.values().copied().max()?;
    let mut winners: Vec<i64> = counts
        .into_iter()
        .filter(|&(_, count)| count == max_found)
        .map(|(finder, _)| finder)
        .collect();
    winners.sort_unstable();

    Some(Leaderboard { max_found, winners })
}

/// Checks whether the guild's investigation just completed.
///
/// Returns `None` while any unfound bullet remains; otherwise the
/// leaderboard over all bullets in the guild.
pub async fn check_completion(
    db: &DatabaseConnection,
    guild_id: i64,
) -> Result<Option<Leaderboard>> {
    if truth_bullet::unfound_remaining(db, guild_id).await? {
        return Ok(None);
    }

    let bullets = truth_bullet::all_for_guild(db, guild_id).await?;
    Ok(tally(&bullets))
}

/// The completion announcement posted to the bullet channel.
#[must_use]
pub fn completion_message(leaderboard: &Leaderboard) -> String {
    let mut lines = vec![
        "**All Truth Bullets have been found.**".to_string(),
        String::new(),
        format!(
            "Best Detective(s) (found {} Truth Bullets):",
            leaderboard.max_found
        ),
    ];
    lines.extend(leaderboard.winners.iter().map(|finder| format!("<@{finder}>")));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::truth_bullet::claim;
    use crate::test_utils::*;

    const GUILD: i64 = 100;
    const CHANNEL: i64 = 200;

    #[tokio::test]
    async fn test_no_completion_while_unfound_remain() -> Result<()> {
        let db = setup_test_db().await?;

        let knife = create_test_bullet(&db, GUILD, CHANNEL, "knife").await?;
        create_test_bullet(&db, GUILD, CHANNEL, "key").await?;

        claim(&db, knife.id, 111).await?;

        assert!(check_completion(&db, GUILD).await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_completion_with_tie() -> Result<()> {
        let db = setup_test_db().await?;

        let knife = create_test_bullet(&db, GUILD, CHANNEL, "knife").await?;
        let key = create_test_bullet(&db, GUILD, CHANNEL, "key").await?;

        claim(&db, knife.id, 222).await?;
        claim(&db, key.id, 111).await?;

        let leaderboard = check_completion(&db, GUILD).await?.unwrap();
        assert_eq!(leaderboard.max_found, 1);
        assert_eq!(leaderboard.winners, vec![111, 222]);

        Ok(())
    }

    #[tokio::test]
    async fn test_completion_excludes_lower_counts() -> Result<()> {
        let db = setup_test_db().await?;

        let knife = create_test_bullet(&db, GUILD, CHANNEL, "knife").await?;
        let key = create_test_bullet(&db, GUILD, CHANNEL, "key").await?;
        let rope = create_test_bullet(&db, GUILD, CHANNEL, "rope").await?;

        claim(&db, knife.id, 111).await?;
        claim(&db, key.id, 111).await?;
        claim(&db, rope.id, 222).await?;

        let leaderboard = check_completion(&db, GUILD).await?.unwrap();
        assert_eq!(leaderboard.max_found, 2);
        assert_eq!(leaderboard.winners, vec![111]);

        Ok(())
    }

    #[tokio::test]
    async fn test_other_guilds_do_not_interfere() -> Result<()> {
        let db = setup_test_db().await?;

        let knife = create_test_bullet(&db, GUILD, CHANNEL, "knife").await?;
        // A different guild still has an open investigation
        create_test_bullet(&db, GUILD + 1, CHANNEL + 1, "key").await?;

        claim(&db, knife.id, 111).await?;

        let leaderboard = check_completion(&db, GUILD).await?.unwrap();
        assert_eq!(leaderboard.winners, vec![111]);

        Ok(())
    }

    #[test]
    fn test_tally_empty_is_none() {
        assert!(tally(&[]).is_none());
    }

    #[test]
    fn test_completion_message_lists_all_winners() {
        let leaderboard = Leaderboard {
            max_found: 2,
            winners: vec![111, 222],
        };

        let message = completion_message(&leaderboard);
        assert_eq!(
            message,
            "**All Truth Bullets have been found.**\n\
             \n\
             Best Detective(s) (found 2 Truth Bullets):\n\
             <@111>\n\
             <@222>"
        );
    }
}
