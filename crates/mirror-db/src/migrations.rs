use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (notes and likes)");
        conn.execute_batch(
            "
            CREATE TABLE notes (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                content         TEXT NOT NULL,
                author_name     TEXT NOT NULL DEFAULT 'Anonymous',
                author_type     TEXT NOT NULL DEFAULT 'anonymous'
                                CHECK (author_type IN ('anonymous', 'signature')),
                like_count      INTEGER NOT NULL DEFAULT 0 CHECK (like_count >= 0),
                helped_count    INTEGER NOT NULL DEFAULT 0 CHECK (helped_count >= 0),
                created_at      TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_notes_created ON notes(created_at);

            CREATE TABLE user_likes (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                user_ip     TEXT NOT NULL,
                note_id     INTEGER NOT NULL REFERENCES notes(id) ON DELETE CASCADE,
                created_at  TEXT NOT NULL DEFAULT (datetime('now')),
                UNIQUE(user_ip, note_id)
            );

            CREATE INDEX idx_user_likes_note ON user_likes(note_id);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    if version < 2 {
        info!("Running migration v2 (wall stickers, reactions, connections)");
        conn.execute_batch(
            "
            CREATE TABLE stickers (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                text        TEXT NOT NULL,
                type        TEXT NOT NULL DEFAULT 'anxiety'
                            CHECK (type IN ('anxiety', 'support')),
                category    TEXT NOT NULL DEFAULT 'general',
                body_part   TEXT,
                intensity   INTEGER NOT NULL DEFAULT 3 CHECK (intensity BETWEEN 1 AND 5),
                position_x  REAL NOT NULL DEFAULT 0,
                position_y  REAL NOT NULL DEFAULT 0,
                rotation    REAL NOT NULL DEFAULT 0,
                same_count  INTEGER NOT NULL DEFAULT 0,
                great_count INTEGER NOT NULL DEFAULT 0,
                created_at  TEXT NOT NULL DEFAULT (datetime('now')),
                updated_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_stickers_created ON stickers(created_at);

            CREATE TABLE sticker_reactions (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                sticker_id      INTEGER NOT NULL REFERENCES stickers(id) ON DELETE CASCADE,
                reaction_type   TEXT NOT NULL CHECK (reaction_type IN ('same', 'great')),
                user_ip         TEXT NOT NULL,
                created_at      TEXT NOT NULL DEFAULT (datetime('now')),
                UNIQUE(sticker_id, reaction_type, user_ip)
            );

            CREATE INDEX idx_sticker_reactions_user ON sticker_reactions(user_ip);

            CREATE TABLE sticker_connections (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                sticker1_id INTEGER NOT NULL REFERENCES stickers(id) ON DELETE CASCADE,
                sticker2_id INTEGER NOT NULL REFERENCES stickers(id) ON DELETE CASCADE,
                created_at  TEXT NOT NULL DEFAULT (datetime('now')),
                CHECK (sticker1_id <> sticker2_id)
            );

            CREATE INDEX idx_sticker_connections_pair
                ON sticker_connections(sticker1_id, sticker2_id);

            INSERT INTO schema_version (version) VALUES (2);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
