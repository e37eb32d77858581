use std::sync::Arc;

use recall_types::Contact;

use crate::error::DirectoryError;

/// Whether the process may read the contact store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    /// Never asked; access should be requested before the first scan.
    NotDetermined,
    /// Blocked by policy; scans will probably fail.
    Restricted,
    Denied,
    Authorized,
}

/// Backing store for a [`ContactDirectory`](crate::ContactDirectory).
///
/// Implementations can read the platform AddressBook, a fixed list, or
/// anything else that can produce every contact in one pass.
pub trait DirectorySource: Send + Sync {
    fn authorization(&self) -> Authorization;

    /// Ask for access. Returns whether it was granted.
    fn request_access(&self) -> Result<bool, DirectoryError>;

    /// Read every contact. Called on each cache refresh.
    fn scan(&self) -> Result<Vec<Contact>, DirectoryError>;
}

impl<T: DirectorySource + ?Sized> DirectorySource for Arc<T> {
    fn authorization(&self) -> Authorization {
        (**self).authorization()
    }

    fn request_access(&self) -> Result<bool, DirectoryError> {
        (**self).request_access()
    }

    fn scan(&self) -> Result<Vec<Contact>, DirectoryError> {
        (**self).scan()
    }
}
