use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use recall_types::Contact;

/// Strip everything but ASCII digits: `"+1 (234) 567-890"` → `"1234567890"`.
pub fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Normalized phone number → contact, remembering the order keys were first seen.
///
/// Every phone variant of a contact gets its own key pointing at one shared
/// value. When two contacts share a key the later one wins, but the key keeps
/// its original position for partial-match scans.
#[derive(Debug, Default, Clone)]
pub struct PhoneIndex {
    entries: HashMap<String, Arc<Contact>>,
    order: Vec<String>,
}

impl PhoneIndex {
    pub fn build(contacts: Vec<Contact>) -> Self {
        let mut index = Self::default();
        for contact in contacts {
            let contact = Arc::new(contact);
            for phone in &contact.phone_numbers {
                let key = normalize_phone(phone);
                if key.is_empty() {
                    continue;
                }
                if index.entries.insert(key.clone(), Arc::clone(&contact)).is_none() {
                    index.order.push(key);
                }
            }
        }
        index
    }

    /// Exact key match, else the first key (in scan order) containing `key`.
    pub fn find(&self, key: &str) -> Option<Arc<Contact>> {
        if key.is_empty() {
            return None;
        }
        if let Some(contact) = self.entries.get(key) {
            return Some(Arc::clone(contact));
        }
        self.order
            .iter()
            .find(|candidate| candidate.contains(key))
            .and_then(|candidate| self.entries.get(candidate))
            .map(Arc::clone)
    }

    pub fn get(&self, key: &str) -> Option<&Arc<Contact>> {
        self.entries.get(key)
    }

    /// Keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Cache state owned by one directory: the index plus its refresh clock.
#[derive(Debug, Clone)]
pub struct ContactCache {
    pub entries: PhoneIndex,
    pub last_refresh: Option<DateTime<Utc>>,
    pub ttl: Duration,
}

impl ContactCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: PhoneIndex::default(),
            last_refresh: None,
            ttl,
        }
    }

    /// Never refreshed, or more than `ttl` has passed since the last refresh.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        match self.last_refresh {
            None => true,
            Some(last) => now.signed_duration_since(last) > self.ttl,
        }
    }
}
