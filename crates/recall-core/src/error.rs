use recall_codec::CodecError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecallError {
    #[error("Message not found: {0}")]
    MessageNotFound(i64),

    #[error(transparent)]
    InvalidIdentifier(#[from] CodecError),

    /// Archive failures pass through unchanged.
    #[error("archive query failed: {0:#}")]
    Archive(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, RecallError>;
