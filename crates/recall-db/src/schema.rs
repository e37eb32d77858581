use anyhow::Result;
use rusqlite::Connection;
use tracing::debug;

/// Create the subset of the archive schema this crate reads.
///
/// Real archives already carry these tables (with many more columns); this
/// is only run against fresh stores built for tests and fixtures.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS handle (
            ROWID               INTEGER PRIMARY KEY AUTOINCREMENT,
            id                  TEXT,
            uncanonicalized_id  TEXT
        );

        CREATE TABLE IF NOT EXISTS chat (
            ROWID           INTEGER PRIMARY KEY AUTOINCREMENT,
            guid            TEXT,
            room_name       TEXT,
            display_name    TEXT
        );

        CREATE TABLE IF NOT EXISTS message (
            ROWID           INTEGER PRIMARY KEY AUTOINCREMENT,
            handle_id       INTEGER REFERENCES handle(ROWID),
            date            INTEGER,
            text            TEXT,
            attributedBody  BLOB,
            is_from_me      INTEGER NOT NULL DEFAULT 0,
            cache_roomnames TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_message_date
            ON message(date);
        ",
    )?;

    debug!("Archive schema created");
    Ok(())
}
