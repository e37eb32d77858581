use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The packed date is not a non-negative 64-bit integer.
    #[error("invalid packed identifier: {0:?}")]
    InvalidIdentifier(String),
}
