use anyhow::{Result, anyhow};
use rusqlite::{Connection, params};
use tracing::{debug, info};

use mirror_types::models::{AuthorType, Like, Note};

use crate::models::{LikeRow, NOTE_COLUMNS, NoteRow};
use crate::{Database, OptionalExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeOutcome {
    Liked,
    AlreadyLiked,
    NoteNotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlikeOutcome {
    Unliked,
    /// The caller had no like on this note; counters were left alone.
    NotLiked,
}

impl Database {
    pub fn list_notes(&self) -> Result<Vec<Note>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {NOTE_COLUMNS} FROM notes ORDER BY created_at DESC, id DESC");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([], NoteRow::from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows.into_iter().map(Note::from).collect())
        })
    }

    pub fn get_note(&self, id: i64) -> Result<Option<Note>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ?1");
            let row = conn.query_row(&sql, [id], NoteRow::from_row).optional()?;
            Ok(row.map(Note::from))
        })
    }

    /// Insert a note with both counters at zero and return its id.
    pub fn create_note(
        &self,
        content: &str,
        author_name: &str,
        author_type: AuthorType,
    ) -> Result<i64> {
        self.with_conn_mut(|conn| {
            let inserted = conn.execute(
                "INSERT INTO notes (content, author_name, author_type, like_count, helped_count)
                 VALUES (?1, ?2, ?3, 0, 0)",
                params![content, author_name, author_type.as_str()],
            )?;
            if inserted == 0 {
                return Err(anyhow!("Note insert affected no rows"));
            }
            let id = conn.last_insert_rowid();
            info!("Note {} created ({})", id, author_type);
            Ok(id)
        })
    }

    /// At most one like per (user_ip, note). The check, the fact-row insert
    /// and the counter bump commit together.
    pub fn like_note(&self, note_id: i64, user_ip: &str) -> Result<LikeOutcome> {
        self.with_tx(|conn| {
            if !note_exists(conn, note_id)? {
                return Ok(LikeOutcome::NoteNotFound);
            }
            if like_exists(conn, note_id, user_ip)? {
                debug!("{} already liked note {}", user_ip, note_id);
                return Ok(LikeOutcome::AlreadyLiked);
            }

            let inserted = conn.execute(
                "INSERT INTO user_likes (user_ip, note_id) VALUES (?1, ?2)",
                params![user_ip, note_id],
            )?;
            if inserted == 0 {
                return Err(anyhow!("Like insert affected no rows for note {}", note_id));
            }

            conn.execute(
                "UPDATE notes
                 SET like_count = like_count + 1, helped_count = helped_count + 1
                 WHERE id = ?1",
                [note_id],
            )?;
            Ok(LikeOutcome::Liked)
        })
    }

    /// Remove the caller's like. Counters are floored at zero.
    pub fn unlike_note(&self, note_id: i64, user_ip: &str) -> Result<UnlikeOutcome> {
        self.with_tx(|conn| {
            let deleted = conn.execute(
                "DELETE FROM user_likes WHERE user_ip = ?1 AND note_id = ?2",
                params![user_ip, note_id],
            )?;
            if deleted == 0 {
                return Ok(UnlikeOutcome::NotLiked);
            }

            conn.execute(
                "UPDATE notes
                 SET like_count = MAX(like_count - 1, 0),
                     helped_count = MAX(helped_count - 1, 0)
                 WHERE id = ?1",
                [note_id],
            )?;
            Ok(UnlikeOutcome::Unliked)
        })
    }

    pub fn is_note_liked(&self, note_id: i64, user_ip: &str) -> Result<bool> {
        self.with_conn(|conn| like_exists(conn, note_id, user_ip))
    }

    pub fn list_user_likes(&self, user_ip: &str) -> Result<Vec<Like>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT user_ip, note_id, created_at FROM user_likes
                 WHERE user_ip = ?1
                 ORDER BY id",
            )?;
            let rows = stmt
                .query_map([user_ip], |row| {
                    Ok(LikeRow {
                        user_ip: row.get(0)?,
                        note_id: row.get(1)?,
                        created_at: row.get(2)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows.into_iter().map(Like::from).collect())
        })
    }
}

fn note_exists(conn: &Connection, note_id: i64) -> Result<bool> {
    let found: Option<i64> = conn
        .query_row("SELECT id FROM notes WHERE id = ?1", [note_id], |row| row.get(0))
        .optional()?;
    Ok(found.is_some())
}

fn like_exists(conn: &Connection, note_id: i64, user_ip: &str) -> Result<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT id FROM user_likes WHERE user_ip = ?1 AND note_id = ?2",
            params![user_ip, note_id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}
