pub mod models;
pub mod queries;
pub mod schema;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

use anyhow::Result;
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

pub use models::{MessageFilter, MessageRow};

/// Where the platform keeps the chat archive.
pub const DEFAULT_ARCHIVE_PATH: &str = "~/Library/Messages/chat.db";

/// Read-only handle on a chat archive.
///
/// The connection is opened once and kept for the lifetime of the value;
/// queries never close it.
pub struct Archive {
    conn: Mutex<Connection>,
}

impl Archive {
    pub fn open(path: &Path) -> Result<Self> {
        let path = expand_home(path);
        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        info!("Archive opened at {} (read-only)", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Writable in-memory archive with the minimal schema, for fixtures.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "journal_mode", "MEMORY")?;
        schema::create_tables(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock().map_err(|e| anyhow::anyhow!("Archive lock poisoned: {}", e))?;
        f(&conn)
    }

    /// Close the connection now. A failing close is logged and otherwise ignored.
    pub fn close(self) {
        let conn = self.conn.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err((_, e)) = conn.close() {
            debug!("Archive close failed: {}", e);
        }
    }
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}
