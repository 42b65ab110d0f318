use anyhow::Result;
use rusqlite::{Connection as SqlConnection, params};
use tracing::info;

use mirror_types::models::Connection;

use crate::models::{CONNECTION_COLUMNS, ConnectionRow};
use crate::stickers::sticker_exists;
use crate::{Database, OptionalExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectOutcome {
    Created(i64),
    /// The pair is already connected, in this or the opposite orientation.
    AlreadyExists,
    SelfLoop,
    StickerNotFound(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectOutcome {
    Removed,
    NotConnected,
}

impl Database {
    /// Connect two stickers. The pair is stored as given; `(a, b)` and
    /// `(b, a)` count as the same connection.
    pub fn create_connection(&self, sticker1_id: i64, sticker2_id: i64) -> Result<ConnectOutcome> {
        if sticker1_id == sticker2_id {
            return Ok(ConnectOutcome::SelfLoop);
        }

        self.with_tx(|conn| {
            for id in [sticker1_id, sticker2_id] {
                if !sticker_exists(conn, id)? {
                    return Ok(ConnectOutcome::StickerNotFound(id));
                }
            }
            if find_pair(conn, sticker1_id, sticker2_id)?.is_some() {
                return Ok(ConnectOutcome::AlreadyExists);
            }

            conn.execute(
                "INSERT INTO sticker_connections (sticker1_id, sticker2_id) VALUES (?1, ?2)",
                params![sticker1_id, sticker2_id],
            )?;
            let id = conn.last_insert_rowid();
            info!("Connected stickers {} and {}", sticker1_id, sticker2_id);
            Ok(ConnectOutcome::Created(id))
        })
    }

    pub fn delete_connection(
        &self,
        sticker1_id: i64,
        sticker2_id: i64,
    ) -> Result<DisconnectOutcome> {
        self.with_conn_mut(|conn| {
            let deleted = conn.execute(
                "DELETE FROM sticker_connections
                 WHERE (sticker1_id = ?1 AND sticker2_id = ?2)
                    OR (sticker1_id = ?2 AND sticker2_id = ?1)",
                params![sticker1_id, sticker2_id],
            )?;
            Ok(if deleted > 0 {
                DisconnectOutcome::Removed
            } else {
                DisconnectOutcome::NotConnected
            })
        })
    }

    pub fn list_connections(&self) -> Result<Vec<Connection>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {CONNECTION_COLUMNS} FROM sticker_connections
                 ORDER BY created_at DESC, id DESC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([], ConnectionRow::from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows.into_iter().map(Connection::from).collect())
        })
    }
}

fn find_pair(conn: &SqlConnection, a: i64, b: i64) -> Result<Option<i64>> {
    conn.query_row(
        "SELECT id FROM sticker_connections
         WHERE (sticker1_id = ?1 AND sticker2_id = ?2)
            OR (sticker1_id = ?2 AND sticker2_id = ?1)",
        params![a, b],
        |row| row.get(0),
    )
    .optional()
}
