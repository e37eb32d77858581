use std::path::PathBuf;

use anyhow::{Context, Result};
use recall_contacts::{DEFAULT_ADDRESS_BOOK_PATH, DEFAULT_TTL_SECS};
use recall_db::DEFAULT_ARCHIVE_PATH;

/// Runtime settings, read from the environment (and `.env` if present).
#[derive(Debug, Clone)]
pub struct Config {
    /// `RECALL_DB_PATH`
    pub db_path: PathBuf,
    /// `RECALL_CONTACTS_DB`; unset disables name resolution, `default` picks the platform store.
    pub contacts_db: Option<PathBuf>,
    /// `RECALL_CONTACTS_TTL_SECS`
    pub contacts_ttl_secs: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let db_path = std::env::var("RECALL_DB_PATH").unwrap_or_else(|_| DEFAULT_ARCHIVE_PATH.into());

        let contacts_db = std::env::var("RECALL_CONTACTS_DB")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(|v| match v.as_str() {
                "default" => PathBuf::from(DEFAULT_ADDRESS_BOOK_PATH),
                _ => PathBuf::from(v),
            });

        let contacts_ttl_secs: i64 = std::env::var("RECALL_CONTACTS_TTL_SECS")
            .unwrap_or_else(|_| DEFAULT_TTL_SECS.to_string())
            .parse()
            .context("RECALL_CONTACTS_TTL_SECS must be a whole number of seconds")?;

        Ok(Self {
            db_path: db_path.into(),
            contacts_db,
            contacts_ttl_secs,
        })
    }

    /// Contact cache lifetime; fails when the seconds value is outside chrono's range.
    pub fn contacts_ttl(&self) -> Result<chrono::Duration> {
        chrono::Duration::try_seconds(self.contacts_ttl_secs).with_context(|| {
            format!("RECALL_CONTACTS_TTL_SECS {} is out of range", self.contacts_ttl_secs)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(ttl: i64) -> Config {
        Config {
            db_path: PathBuf::from(DEFAULT_ARCHIVE_PATH),
            contacts_db: None,
            contacts_ttl_secs: ttl,
        }
    }

    #[test]
    fn ttl_in_range_converts() {
        assert_eq!(config(300).contacts_ttl().unwrap(), chrono::Duration::seconds(300));
    }

    #[test]
    fn huge_ttl_is_an_error() {
        assert!(config(i64::MAX).contacts_ttl().is_err());
        assert!(config(10_000_000_000_000_000).contacts_ttl().is_err());
    }
}
