/// Contact resolution for message senders.
///
/// A [`ContactDirectory`] keeps a TTL cache of normalized phone number →
/// contact over any [`DirectorySource`]: the platform AddressBook store or
/// an in-memory list.

pub mod addressbook;
pub mod cache;
pub mod directory;
pub mod error;
pub mod memory;
pub mod source;

pub use addressbook::{AddressBookDb, DEFAULT_ADDRESS_BOOK_PATH};
pub use cache::{ContactCache, PhoneIndex, normalize_phone};
pub use directory::{ContactDirectory, DEFAULT_TTL_SECS};
pub use error::DirectoryError;
pub use memory::StaticDirectory;
pub use source::{Authorization, DirectorySource};
pub use recall_types::Contact;
