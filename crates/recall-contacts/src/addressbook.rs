use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use recall_types::Contact;
use rusqlite::{Connection, OpenFlags};
use tracing::{debug, info};

use crate::error::DirectoryError;
use crate::source::{Authorization, DirectorySource};

/// Where the platform keeps the local AddressBook store.
pub const DEFAULT_ADDRESS_BOOK_PATH: &str =
    "~/Library/Application Support/AddressBook/AddressBook-v22.abcddb";

/// One row per (person, phone number), grouped by person.
const PHONE_ROWS: &str = "SELECT r.Z_PK, r.ZFIRSTNAME, r.ZLASTNAME, p.ZFULLNUMBER
     FROM ZABCDRECORD r
     JOIN ZABCDPHONENUMBER p ON p.ZOWNER = r.Z_PK
     WHERE p.ZFULLNUMBER IS NOT NULL
     ORDER BY r.Z_PK, p.Z_PK";

/// Contact source backed by an AddressBook SQLite file, opened read-only per scan.
pub struct AddressBookDb {
    path: PathBuf,
}

impl AddressBookDb {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DirectorySource for AddressBookDb {
    /// Access is whatever the filesystem says about opening the store.
    fn authorization(&self) -> Authorization {
        match File::open(&self.path) {
            Ok(_) => Authorization::Authorized,
            Err(e) if e.kind() == ErrorKind::PermissionDenied => Authorization::Denied,
            Err(e) if e.kind() == ErrorKind::NotFound => Authorization::NotDetermined,
            Err(e) => {
                debug!("AddressBook at {} not readable: {}", self.path.display(), e);
                Authorization::Restricted
            }
        }
    }

    /// There is no prompt for a plain file; report whether it can be opened now.
    fn request_access(&self) -> Result<bool, DirectoryError> {
        match File::open(&self.path) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::PermissionDenied => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn scan(&self) -> Result<Vec<Contact>, DirectoryError> {
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        let mut stmt = conn.prepare(PHONE_ROWS)?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut contacts: Vec<Contact> = Vec::new();
        let mut current: Option<i64> = None;
        for row in rows {
            let (pk, given, family, phone) = row?;
            match contacts.last_mut() {
                Some(contact) if current == Some(pk) => contact.phone_numbers.push(phone),
                _ => {
                    contacts.push(Contact::new(
                        given.unwrap_or_default(),
                        family.unwrap_or_default(),
                        vec![phone],
                    ));
                    current = Some(pk);
                }
            }
        }

        info!("Scanned {} contacts from {}", contacts.len(), self.path.display());
        Ok(contacts)
    }
}
