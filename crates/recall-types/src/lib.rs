pub mod models;

pub use models::{Contact, MessageRecord, SELF_SENDER};
