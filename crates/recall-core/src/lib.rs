/// Message reconstruction: archive rows in, readable message records out.
///
/// Each row gets its packed date decoded, its body recovered from the text
/// column or the archived blob, its sender resolved against the contact
/// directory and its room mapped to a group display name.

pub mod error;
pub mod reconstruct;

pub use error::{RecallError, Result};
pub use reconstruct::{DEFAULT_DIRECTION_LIMIT, DEFAULT_RECENT_LIMIT, MessageReconstructor};
