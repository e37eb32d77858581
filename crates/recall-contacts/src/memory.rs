use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use recall_types::Contact;

use crate::error::DirectoryError;
use crate::source::{Authorization, DirectorySource};

/// In-memory contact source.
///
/// Contents can be swapped at any time; the next refresh of a directory
/// built on it sees the new list. Scans can be made to fail on demand.
pub struct StaticDirectory {
    contacts: Mutex<Vec<Contact>>,
    authorization: Mutex<Authorization>,
    failing: AtomicBool,
    scans: AtomicUsize,
}

impl StaticDirectory {
    pub fn new(contacts: Vec<Contact>) -> Self {
        Self {
            contacts: Mutex::new(contacts),
            authorization: Mutex::new(Authorization::Authorized),
            failing: AtomicBool::new(false),
            scans: AtomicUsize::new(0),
        }
    }

    pub fn with_authorization(self, authorization: Authorization) -> Self {
        *lock(&self.authorization) = authorization;
        self
    }

    /// Replace the contents seen by subsequent scans.
    pub fn replace(&self, contacts: Vec<Contact>) {
        *lock(&self.contacts) = contacts;
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }

    /// Number of scans attempted so far, failed ones included.
    pub fn scan_count(&self) -> usize {
        self.scans.load(Ordering::Relaxed)
    }
}

impl DirectorySource for StaticDirectory {
    fn authorization(&self) -> Authorization {
        *lock(&self.authorization)
    }

    fn request_access(&self) -> Result<bool, DirectoryError> {
        let mut auth = lock(&self.authorization);
        if *auth == Authorization::NotDetermined {
            *auth = Authorization::Authorized;
        }
        Ok(*auth == Authorization::Authorized)
    }

    fn scan(&self) -> Result<Vec<Contact>, DirectoryError> {
        self.scans.fetch_add(1, Ordering::Relaxed);
        if self.failing.load(Ordering::Relaxed) {
            return Err(DirectoryError::Scan("static directory set to fail".into()));
        }
        Ok(lock(&self.contacts).clone())
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
