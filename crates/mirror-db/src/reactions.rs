use anyhow::Result;
use rusqlite::params;
use tracing::{debug, warn};

use mirror_types::api::UserReactions;
use mirror_types::models::{Reaction, ReactionCounts, ReactionType};

use crate::models::{REACTION_COLUMNS, ReactionRow};
use crate::stickers::sticker_exists;
use crate::{Database, OptionalExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionOutcome {
    Added,
    AlreadyReacted,
    StickerNotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveReactionOutcome {
    Removed,
    NotReacted,
}

// Reactions never touch stickers.same_count / great_count. Counts are
// aggregated from sticker_reactions on read.
impl Database {
    pub fn add_reaction(
        &self,
        sticker_id: i64,
        reaction_type: ReactionType,
        user_ip: &str,
    ) -> Result<ReactionOutcome> {
        self.with_tx(|conn| {
            if !sticker_exists(conn, sticker_id)? {
                return Ok(ReactionOutcome::StickerNotFound);
            }

            let existing: Option<i64> = conn
                .query_row(
                    "SELECT id FROM sticker_reactions
                     WHERE sticker_id = ?1 AND reaction_type = ?2 AND user_ip = ?3",
                    params![sticker_id, reaction_type.as_str(), user_ip],
                    |row| row.get(0),
                )
                .optional()?;
            if existing.is_some() {
                debug!("{} already reacted {} on sticker {}", user_ip, reaction_type, sticker_id);
                return Ok(ReactionOutcome::AlreadyReacted);
            }

            conn.execute(
                "INSERT INTO sticker_reactions (sticker_id, reaction_type, user_ip)
                 VALUES (?1, ?2, ?3)",
                params![sticker_id, reaction_type.as_str(), user_ip],
            )?;
            Ok(ReactionOutcome::Added)
        })
    }

    pub fn remove_reaction(
        &self,
        sticker_id: i64,
        reaction_type: ReactionType,
        user_ip: &str,
    ) -> Result<RemoveReactionOutcome> {
        self.with_conn_mut(|conn| {
            let deleted = conn.execute(
                "DELETE FROM sticker_reactions
                 WHERE sticker_id = ?1 AND reaction_type = ?2 AND user_ip = ?3",
                params![sticker_id, reaction_type.as_str(), user_ip],
            )?;
            Ok(if deleted > 0 {
                RemoveReactionOutcome::Removed
            } else {
                RemoveReactionOutcome::NotReacted
            })
        })
    }

    pub fn get_reaction_counts(&self, sticker_id: i64) -> Result<ReactionCounts> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT reaction_type, COUNT(*) FROM sticker_reactions
                 WHERE sticker_id = ?1
                 GROUP BY reaction_type",
            )?;
            let rows = stmt
                .query_map([sticker_id], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            let mut counts = ReactionCounts::default();
            for (raw, n) in rows {
                match raw.parse::<ReactionType>() {
                    Ok(reaction_type) => counts.add(reaction_type, n),
                    Err(e) => warn!("Sticker {}: skipping {} rows: {}", sticker_id, n, e),
                }
            }
            Ok(counts)
        })
    }

    /// Every reaction the caller has left, grouped by sticker id.
    pub fn get_user_reactions(&self, user_ip: &str) -> Result<UserReactions> {
        let reactions = self.with_conn(|conn| {
            let sql = format!(
                "SELECT {REACTION_COLUMNS} FROM sticker_reactions WHERE user_ip = ?1 ORDER BY id"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([user_ip], ReactionRow::from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })?;

        let mut by_sticker = UserReactions::new();
        for row in reactions {
            let id = row.id;
            match Reaction::try_from(row) {
                Ok(reaction) => by_sticker
                    .entry(reaction.sticker_id)
                    .or_default()
                    .push(reaction.reaction_type),
                Err(e) => warn!("Corrupt reaction '{}': {}", id, e),
            }
        }
        Ok(by_sticker)
    }
}
