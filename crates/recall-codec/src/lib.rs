/// Decoders for the two non-trivial archive encodings: packed Snowflake-style
/// dates and legacy archived message bodies. Both are pure functions.

pub mod attributed;
pub mod error;
pub mod snowflake;

pub use attributed::{extract_archived_text, extract_body};
pub use error::CodecError;
pub use snowflake::{DecodedTimestamp, decode, decode_i64, decode_str};
