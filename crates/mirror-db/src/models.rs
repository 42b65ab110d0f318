//! Database row types. These map directly to SQLite rows.
//! Distinct from mirror-types entities to keep the DB layer independent;
//! the `From` impls below are the only place the two shapes meet.

use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::Row;
use tracing::warn;

use mirror_types::models::{
    AuthorType, Connection, Like, Note, Reaction, ReactionType, Sticker, StickerType,
};

pub(crate) const NOTE_COLUMNS: &str =
    "id, content, author_name, author_type, like_count, helped_count, created_at";

pub(crate) const STICKER_COLUMNS: &str = "id, text, type, category, body_part, intensity, \
     position_x, position_y, rotation, same_count, great_count, created_at, updated_at";

pub(crate) const CONNECTION_COLUMNS: &str = "id, sticker1_id, sticker2_id, created_at";

pub(crate) const REACTION_COLUMNS: &str = "id, sticker_id, reaction_type, user_ip, created_at";

pub struct NoteRow {
    pub id: i64,
    pub content: String,
    pub author_name: String,
    pub author_type: String,
    pub like_count: i64,
    pub helped_count: i64,
    pub created_at: String,
}

impl NoteRow {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            content: row.get(1)?,
            author_name: row.get(2)?,
            author_type: row.get(3)?,
            like_count: row.get(4)?,
            helped_count: row.get(5)?,
            created_at: row.get(6)?,
        })
    }
}

pub struct LikeRow {
    pub user_ip: String,
    pub note_id: i64,
    pub created_at: String,
}

pub struct StickerRow {
    pub id: i64,
    pub text: String,
    pub sticker_type: String,
    pub category: String,
    pub body_part: Option<String>,
    pub intensity: i64,
    pub position_x: f64,
    pub position_y: f64,
    pub rotation: f64,
    pub same_count: i64,
    pub great_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl StickerRow {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            text: row.get(1)?,
            sticker_type: row.get(2)?,
            category: row.get(3)?,
            body_part: row.get(4)?,
            intensity: row.get(5)?,
            position_x: row.get(6)?,
            position_y: row.get(7)?,
            rotation: row.get(8)?,
            same_count: row.get(9)?,
            great_count: row.get(10)?,
            created_at: row.get(11)?,
            updated_at: row.get(12)?,
        })
    }
}

pub struct ConnectionRow {
    pub id: i64,
    pub sticker1_id: i64,
    pub sticker2_id: i64,
    pub created_at: String,
}

impl ConnectionRow {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            sticker1_id: row.get(1)?,
            sticker2_id: row.get(2)?,
            created_at: row.get(3)?,
        })
    }
}

pub struct ReactionRow {
    pub id: i64,
    pub sticker_id: i64,
    pub reaction_type: String,
    pub user_ip: String,
    pub created_at: String,
}

impl ReactionRow {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            sticker_id: row.get(1)?,
            reaction_type: row.get(2)?,
            user_ip: row.get(3)?,
            created_at: row.get(4)?,
        })
    }
}

/// SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS" without timezone.
/// Accept RFC 3339 too, and treat anything unparseable as the epoch.
pub fn parse_timestamp(raw: &str, table: &str, id: i64) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt timestamp '{}' on {} '{}': {}", raw, table, id, e);
            DateTime::default()
        })
}

impl From<NoteRow> for Note {
    fn from(row: NoteRow) -> Self {
        let author_type = row.author_type.parse().unwrap_or_else(|e| {
            warn!("Note '{}': {}, treating as anonymous", row.id, e);
            AuthorType::Anonymous
        });
        Note {
            created_at: parse_timestamp(&row.created_at, "note", row.id),
            id: row.id,
            content: row.content,
            author_name: row.author_name,
            author_type,
            like_count: row.like_count.max(0),
            helped_count: row.helped_count.max(0),
        }
    }
}

impl From<LikeRow> for Like {
    fn from(row: LikeRow) -> Self {
        Like {
            created_at: parse_timestamp(&row.created_at, "like on note", row.note_id),
            user_ip: row.user_ip,
            note_id: row.note_id,
        }
    }
}

impl From<StickerRow> for Sticker {
    fn from(row: StickerRow) -> Self {
        let sticker_type = row.sticker_type.parse().unwrap_or_else(|e| {
            warn!("Sticker '{}': {}, treating as anxiety", row.id, e);
            StickerType::Anxiety
        });
        Sticker {
            created_at: parse_timestamp(&row.created_at, "sticker", row.id),
            updated_at: parse_timestamp(&row.updated_at, "sticker", row.id),
            id: row.id,
            text: row.text,
            sticker_type,
            category: row.category,
            body_part: row.body_part,
            intensity: row.intensity,
            position_x: row.position_x,
            position_y: row.position_y,
            rotation: row.rotation,
            same_count: row.same_count,
            great_count: row.great_count,
        }
    }
}

impl From<ConnectionRow> for Connection {
    fn from(row: ConnectionRow) -> Self {
        Connection {
            created_at: parse_timestamp(&row.created_at, "connection", row.id),
            id: row.id,
            sticker1_id: row.sticker1_id,
            sticker2_id: row.sticker2_id,
        }
    }
}

impl TryFrom<ReactionRow> for Reaction {
    type Error = mirror_types::models::UnknownVariant;

    fn try_from(row: ReactionRow) -> Result<Self, Self::Error> {
        let reaction_type: ReactionType = row.reaction_type.parse()?;
        Ok(Reaction {
            created_at: parse_timestamp(&row.created_at, "reaction", row.id),
            id: row.id,
            sticker_id: row.sticker_id,
            reaction_type,
            user_ip: row.user_ip,
        })
    }
}
