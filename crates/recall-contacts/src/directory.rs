use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use recall_types::Contact;
use tracing::{debug, error, info, warn};

use crate::cache::{ContactCache, PhoneIndex, normalize_phone};
use crate::error::DirectoryError;
use crate::source::{Authorization, DirectorySource};

/// Default time a scan stays fresh.
pub const DEFAULT_TTL_SECS: i64 = 300;

/// Phone-number lookups over a contact source, cached for `ttl`.
///
/// The cache is rebuilt from a full scan on the first lookup and on the
/// first lookup after it expires. A failed scan keeps the previous entries.
pub struct ContactDirectory {
    source: Box<dyn DirectorySource>,
    cache: Mutex<ContactCache>,
}

impl ContactDirectory {
    pub fn new(source: impl DirectorySource + 'static) -> Result<Self, DirectoryError> {
        Self::with_ttl(source, Duration::seconds(DEFAULT_TTL_SECS))
    }

    /// Fails with `AccessDenied` if the source reports access as denied.
    pub fn with_ttl(
        source: impl DirectorySource + 'static,
        ttl: Duration,
    ) -> Result<Self, DirectoryError> {
        ensure_access(&source)?;
        Ok(Self {
            source: Box::new(source),
            cache: Mutex::new(ContactCache::new(ttl)),
        })
    }

    pub fn lookup(&self, phone_number: &str) -> Option<Arc<Contact>> {
        self.lookup_at(phone_number, Utc::now())
    }

    /// Look up a contact as of `now`, refreshing first if the cache is stale.
    pub fn lookup_at(&self, phone_number: &str, now: DateTime<Utc>) -> Option<Arc<Contact>> {
        let mut cache = self.cache();
        self.refresh_if_stale_locked(&mut cache, now);
        cache.entries.find(&normalize_phone(phone_number))
    }

    /// Rescan the source and swap in the result. Leaves the cache untouched on error.
    pub fn refresh_at(&self, now: DateTime<Utc>) -> Result<usize, DirectoryError> {
        let mut cache = self.cache();
        self.refresh_locked(&mut cache, now)
    }

    /// Refresh only if the TTL has run out. Scan failures are logged, and
    /// the stale entries stay in use until the next TTL expiry.
    pub fn refresh_if_stale(&self, now: DateTime<Utc>) {
        let mut cache = self.cache();
        self.refresh_if_stale_locked(&mut cache, now);
    }

    pub fn ttl(&self) -> Duration {
        self.cache().ttl
    }

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.cache().last_refresh
    }

    /// Number of phone keys currently cached.
    pub fn len(&self) -> usize {
        self.cache().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn refresh_if_stale_locked(&self, cache: &mut ContactCache, now: DateTime<Utc>) {
        if !cache.is_stale(now) {
            return;
        }
        if let Err(e) = self.refresh_locked(cache, now) {
            warn!(
                keys = cache.entries.len(),
                "Contact refresh failed, keeping previous entries: {}", e
            );
            cache.last_refresh = Some(now);
        }
    }

    fn refresh_locked(
        &self,
        cache: &mut ContactCache,
        now: DateTime<Utc>,
    ) -> Result<usize, DirectoryError> {
        let contacts = self.source.scan()?;
        let scanned = contacts.len();

        cache.entries = PhoneIndex::build(contacts);
        cache.last_refresh = Some(now);

        debug!(contacts = scanned, keys = cache.entries.len(), "Contact cache refreshed");
        Ok(cache.entries.len())
    }

    fn cache(&self) -> MutexGuard<'_, ContactCache> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn ensure_access(source: &dyn DirectorySource) -> Result<(), DirectoryError> {
    match source.authorization() {
        Authorization::Authorized => Ok(()),
        Authorization::Denied => Err(DirectoryError::AccessDenied),
        Authorization::Restricted => {
            warn!("Contacts access is restricted; names may not resolve");
            Ok(())
        }
        Authorization::NotDetermined => {
            match source.request_access() {
                Ok(granted) => info!("Contacts access granted: {}", granted),
                Err(e) => error!("Error requesting contacts access: {}", e),
            }
            Ok(())
        }
    }
}
