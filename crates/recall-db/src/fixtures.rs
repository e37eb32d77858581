/// Writers for building small archives in memory. Only compiled for tests
/// and the `fixtures` feature; real archives are never written to.

use crate::Archive;
use anyhow::Result;

/// A `message` row to insert. Unset fields stay NULL.
#[derive(Debug, Clone, Default)]
pub struct NewMessage {
    pub handle_id: Option<i64>,
    pub date: Option<i64>,
    pub text: Option<String>,
    pub attributed_body: Option<Vec<u8>>,
    pub is_from_me: bool,
    pub room_name: Option<String>,
}

impl Archive {
    /// Insert a handle and return its ROWID.
    pub fn insert_handle(&self, id: &str, uncanonicalized_id: Option<&str>) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO handle (id, uncanonicalized_id) VALUES (?1, ?2)",
                rusqlite::params![id, uncanonicalized_id],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Insert a message and return its ROWID.
    pub fn insert_message(&self, msg: &NewMessage) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO message (handle_id, date, text, attributedBody, is_from_me, cache_roomnames)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    msg.handle_id,
                    msg.date,
                    msg.text,
                    msg.attributed_body,
                    msg.is_from_me,
                    msg.room_name,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn insert_chat(&self, room_name: &str, display_name: Option<&str>) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO chat (guid, room_name, display_name) VALUES (?1, ?2, ?3)",
                rusqlite::params![format!("iMessage;+;{}", room_name), room_name, display_name],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }
}
