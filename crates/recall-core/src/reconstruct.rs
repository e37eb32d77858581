use std::collections::HashMap;

use chrono::{DateTime, Utc};
use recall_codec::{CodecError, decode_i64, extract_body};
use recall_contacts::ContactDirectory;
use recall_db::{Archive, MessageFilter, MessageRow};
use recall_types::{MessageRecord, SELF_SENDER};
use tracing::{debug, warn};

use crate::error::{RecallError, Result};

/// Page size for `list_recent` when the caller has no preference.
pub const DEFAULT_RECENT_LIMIT: u32 = 10;

/// Page size for inbound/outbound listings when the caller has no preference.
pub const DEFAULT_DIRECTION_LIMIT: u32 = 100;

/// Joins archive rows with decoded dates, recovered bodies, contact names
/// and group names.
///
/// Listings come back in archive order (newest packed date first). Rows whose
/// body cannot be recovered, or whose packed date does not decode, are left
/// out of listings.
pub struct MessageReconstructor {
    archive: Archive,
    contacts: Option<ContactDirectory>,
}

impl MessageReconstructor {
    pub fn new(archive: Archive, contacts: Option<ContactDirectory>) -> Self {
        Self { archive, contacts }
    }

    pub fn archive(&self) -> &Archive {
        &self.archive
    }

    pub fn contacts(&self) -> Option<&ContactDirectory> {
        self.contacts.as_ref()
    }

    /// All messages, newest first, optionally capped.
    pub fn list_recent(&self, limit: Option<u32>) -> Result<Vec<MessageRecord>> {
        self.list(&MessageFilter::All, limit)
    }

    /// A single message. Unlike listings, an unrecoverable body comes back as `""`.
    pub fn get_by_id(&self, row_id: i64) -> Result<MessageRecord> {
        let row = self
            .archive
            .message_by_id(row_id)?
            .ok_or(RecallError::MessageNotFound(row_id))?;
        let chats = self.archive.chat_mapping()?;

        let body = extract_body(row.text.as_deref(), row.attributed_body.as_deref()).unwrap_or_default();
        self.assemble(row, body, &chats, Utc::now())
    }

    /// Conversation with one sender, matched exactly against the handle id.
    pub fn list_by_sender(&self, phone_number: &str) -> Result<Vec<MessageRecord>> {
        self.list(&MessageFilter::Sender(phone_number.to_string()), None)
    }

    pub fn list_by_room(&self, room_name: &str) -> Result<Vec<MessageRecord>> {
        self.list(&MessageFilter::Room(room_name.to_string()), None)
    }

    pub fn list_inbound(&self, limit: u32) -> Result<Vec<MessageRecord>> {
        self.list(&MessageFilter::Inbound, Some(limit))
    }

    pub fn list_outbound(&self, limit: u32) -> Result<Vec<MessageRecord>> {
        self.list(&MessageFilter::Outbound, Some(limit))
    }

    /// Distinct group room names seen on messages.
    pub fn group_room_names(&self) -> Result<Vec<String>> {
        Ok(self.archive.group_room_names()?)
    }

    pub fn chat_mapping(&self) -> Result<HashMap<String, String>> {
        Ok(self.archive.chat_mapping()?)
    }

    fn list(&self, filter: &MessageFilter, limit: Option<u32>) -> Result<Vec<MessageRecord>> {
        let rows = self.archive.messages(filter, limit)?;
        // One chat-name snapshot per batch.
        let chats = self.archive.chat_mapping()?;
        let now = Utc::now();

        let total = rows.len();
        let mut records = Vec::with_capacity(total);
        for row in rows {
            let Some(body) = extract_body(row.text.as_deref(), row.attributed_body.as_deref()) else {
                continue;
            };
            let row_id = row.row_id;
            match self.assemble(row, body, &chats, now) {
                Ok(record) => records.push(record),
                Err(RecallError::InvalidIdentifier(e)) => {
                    warn!(row_id, error = %e, "Skipping message with unreadable date");
                }
                Err(e) => return Err(e),
            }
        }

        debug!(
            filter = ?filter,
            rows = total,
            skipped = total - records.len(),
            "Reconstructed messages"
        );
        Ok(records)
    }

    fn assemble(
        &self,
        row: MessageRow,
        body: String,
        chats: &HashMap<String, String>,
        now: DateTime<Utc>,
    ) -> Result<MessageRecord> {
        let timestamp = resolve_timestamp(row.date, now)?;
        let sender = row.sender.unwrap_or_else(|| SELF_SENDER.to_string());

        let resolved_name = match &self.contacts {
            Some(directory) if !row.is_from_me && sender != SELF_SENDER => {
                directory.lookup(&sender).map(|contact| contact.full_name())
            }
            _ => None,
        };

        let group_display_name = row.room_name.as_ref().and_then(|room| chats.get(room).cloned());

        Ok(MessageRecord {
            row_id: row.row_id,
            timestamp,
            body,
            sender_identifier: sender,
            is_from_me: row.is_from_me,
            room_name: row.room_name.unwrap_or_default(),
            group_display_name,
            resolved_name,
        })
    }
}

/// A missing (NULL or zero) packed date falls back to `now`.
fn resolve_timestamp(date: Option<i64>, now: DateTime<Utc>) -> std::result::Result<DateTime<Utc>, CodecError> {
    match date {
        None | Some(0) => Ok(now),
        Some(packed) => Ok(decode_i64(packed)?.utc_time),
    }
}
