use thiserror::Error;

#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The user refused contacts access. Fatal when building a directory.
    #[error("Contact access denied. Enable it in System Settings -> Privacy & Security -> Contacts")]
    AccessDenied,

    #[error("contact scan failed: {0}")]
    Scan(String),

    #[error("contact store error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("contact store I/O error: {0}")]
    Io(#[from] std::io::Error),
}
