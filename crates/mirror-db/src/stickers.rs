use anyhow::{Result, anyhow};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter};
use tracing::info;

use mirror_types::filter::{CategoryFilter, IntensityFilter, StickerFilter};
use mirror_types::models::{Sticker, StickerType};

use crate::models::{STICKER_COLUMNS, StickerRow};
use crate::{Database, OptionalExt};

/// A sticker as submitted. Intensity is expected to already be on the 1..=5
/// scale; the caller clamps it.
#[derive(Debug, Clone)]
pub struct NewSticker<'a> {
    pub text: &'a str,
    pub sticker_type: StickerType,
    pub category: &'a str,
    pub body_part: Option<&'a str>,
    pub intensity: i64,
    pub position_x: f64,
    pub position_y: f64,
    pub rotation: f64,
}

impl Database {
    pub fn list_stickers(&self) -> Result<Vec<Sticker>> {
        self.filter_stickers(&StickerFilter::all())
    }

    pub fn get_sticker(&self, id: i64) -> Result<Option<Sticker>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {STICKER_COLUMNS} FROM stickers WHERE id = ?1");
            let row = conn.query_row(&sql, [id], StickerRow::from_row).optional()?;
            Ok(row.map(Sticker::from))
        })
    }

    pub fn create_sticker(&self, sticker: &NewSticker<'_>) -> Result<i64> {
        self.with_conn_mut(|conn| {
            let inserted = conn.execute(
                "INSERT INTO stickers
                    (text, type, category, body_part, intensity, position_x, position_y, rotation)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    sticker.text,
                    sticker.sticker_type.as_str(),
                    sticker.category,
                    sticker.body_part,
                    sticker.intensity,
                    sticker.position_x,
                    sticker.position_y,
                    sticker.rotation,
                ],
            )?;
            if inserted == 0 {
                return Err(anyhow!("Sticker insert affected no rows"));
            }
            let id = conn.last_insert_rowid();
            info!(
                "Sticker {} created ({}, {}, intensity {})",
                id, sticker.sticker_type, sticker.category, sticker.intensity
            );
            Ok(id)
        })
    }

    /// Move a sticker. `rotation: None` keeps the current rotation.
    /// Returns false if no sticker has this id.
    pub fn update_sticker_position(
        &self,
        id: i64,
        position_x: f64,
        position_y: f64,
        rotation: Option<f64>,
    ) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let updated = match rotation {
                Some(rotation) => conn.execute(
                    "UPDATE stickers
                     SET position_x = ?1, position_y = ?2, rotation = ?3,
                         updated_at = datetime('now')
                     WHERE id = ?4",
                    params![position_x, position_y, rotation, id],
                )?,
                None => conn.execute(
                    "UPDATE stickers
                     SET position_x = ?1, position_y = ?2, updated_at = datetime('now')
                     WHERE id = ?3",
                    params![position_x, position_y, id],
                )?,
            };
            Ok(updated > 0)
        })
    }

    /// Hard delete. Reactions and connections go with it (ON DELETE CASCADE).
    pub fn delete_sticker(&self, id: i64) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let deleted = conn.execute("DELETE FROM stickers WHERE id = ?1", [id])?;
            if deleted > 0 {
                info!("Sticker {} deleted", id);
            }
            Ok(deleted > 0)
        })
    }

    pub fn filter_stickers(&self, filter: &StickerFilter) -> Result<Vec<Sticker>> {
        let mut clauses: Vec<&str> = Vec::new();
        let mut values: Vec<Value> = Vec::new();

        match &filter.category {
            CategoryFilter::All => {}
            CategoryFilter::Type(sticker_type) => {
                clauses.push("type = ?");
                values.push(Value::Text(sticker_type.as_str().to_string()));
            }
            CategoryFilter::Category(category) => {
                clauses.push("category = ?");
                values.push(Value::Text(category.clone()));
            }
        }

        if let IntensityFilter::Exactly(intensity) = filter.intensity {
            clauses.push("intensity = ?");
            values.push(Value::Integer(intensity));
        }

        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", clauses.join(" AND "))
        };
        let sql = format!(
            "SELECT {STICKER_COLUMNS} FROM stickers{where_clause} ORDER BY created_at DESC, id DESC"
        );

        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params_from_iter(values.iter()), StickerRow::from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows.into_iter().map(Sticker::from).collect())
        })
    }
}

pub(crate) fn sticker_exists(conn: &rusqlite::Connection, id: i64) -> Result<bool> {
    let found: Option<i64> = conn
        .query_row("SELECT id FROM stickers WHERE id = ?1", [id], |row| row.get(0))
        .optional()?;
    Ok(found.is_some())
}
