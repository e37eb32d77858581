/// Archive row types — these map directly to SQLite rows.
/// Distinct from recall-types models to keep the DB layer independent.

/// One `message` row joined with its sender `handle`.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageRow {
    pub row_id: i64,
    /// Packed date; NULL in some rows.
    pub date: Option<i64>,
    pub text: Option<String>,
    pub attributed_body: Option<Vec<u8>>,
    /// `handle.id` of the sender; NULL for own messages and dangling references.
    pub sender: Option<String>,
    pub is_from_me: bool,
    pub room_name: Option<String>,
}

/// Which messages a list query selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageFilter {
    All,
    /// Exact `handle.id` match.
    Sender(String),
    /// Exact `cache_roomnames` match.
    Room(String),
    Inbound,
    Outbound,
}
