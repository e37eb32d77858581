use std::collections::HashMap;

use crate::models::{MessageFilter, MessageRow};
use crate::Archive;
use anyhow::Result;
use rusqlite::types::ToSql;
use rusqlite::{Connection, Row};

/// Message columns joined with the sender handle. Column order matches `map_message_row`.
const MESSAGE_SELECT: &str = "SELECT m.ROWID, m.date, m.text, m.attributedBody, h.id, m.is_from_me, m.cache_roomnames
     FROM message m
     LEFT JOIN handle h ON m.handle_id = h.ROWID";

/// Archive-native ordering: newest packed date first.
const MESSAGE_ORDER: &str = "ORDER BY m.date DESC, m.ROWID DESC";

const CHAT_NAMES: &str =
    "SELECT room_name, display_name FROM chat WHERE room_name IS NOT NULL AND display_name IS NOT NULL";

const GROUP_ROOM_NAMES: &str = "SELECT DISTINCT cache_roomnames FROM message
     WHERE cache_roomnames IS NOT NULL
     ORDER BY cache_roomnames";

impl Archive {
    // -- Messages --

    /// Messages matching `filter`, newest first. `None` means no limit.
    pub fn messages(&self, filter: &MessageFilter, limit: Option<u32>) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| query_messages(conn, filter, limit))
    }

    pub fn message_by_id(&self, row_id: i64) -> Result<Option<MessageRow>> {
        self.with_conn(|conn| {
            let sql = format!("{} WHERE m.ROWID = ?1", MESSAGE_SELECT);
            conn.query_row(&sql, [row_id], map_message_row).optional()
        })
    }

    // -- Chats --

    /// Room name → human-readable group name, from the `chat` table.
    pub fn chat_mapping(&self) -> Result<HashMap<String, String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(CHAT_NAMES)?;
            let pairs = stmt
                .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
                .collect::<std::result::Result<HashMap<_, _>, _>>()?;
            Ok(pairs)
        })
    }

    /// Distinct room names referenced by messages.
    pub fn group_room_names(&self) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(GROUP_ROOM_NAMES)?;
            let names = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(names)
        })
    }
}

fn query_messages(
    conn: &Connection,
    filter: &MessageFilter,
    limit: Option<u32>,
) -> Result<Vec<MessageRow>> {
    let (clause, value): (&str, Option<&String>) = match filter {
        MessageFilter::All => ("", None),
        MessageFilter::Sender(phone) => ("WHERE h.id = ?2", Some(phone)),
        MessageFilter::Room(room) => ("WHERE m.cache_roomnames = ?2", Some(room)),
        MessageFilter::Inbound => ("WHERE COALESCE(m.is_from_me, 0) = 0", None),
        MessageFilter::Outbound => ("WHERE COALESCE(m.is_from_me, 0) != 0", None),
    };

    // SQLite treats a negative LIMIT as unbounded.
    let limit: i64 = limit.map(i64::from).unwrap_or(-1);

    let sql = format!("{} {} {} LIMIT ?1", MESSAGE_SELECT, clause, MESSAGE_ORDER);
    let mut params: Vec<&dyn ToSql> = vec![&limit];
    if let Some(value) = value {
        params.push(value);
    }

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params.as_slice(), map_message_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn map_message_row(row: &Row<'_>) -> rusqlite::Result<MessageRow> {
    Ok(MessageRow {
        row_id: row.get(0)?,
        date: row.get(1)?,
        text: row.get(2)?,
        attributed_body: row.get(3)?,
        sender: row.get(4)?,
        is_from_me: row.get::<_, Option<bool>>(5)?.unwrap_or(false),
        room_name: row.get(6)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
