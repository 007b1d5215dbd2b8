use thiserror::Error;

use atria_core::error::CoreError;
use atria_core::models::session_id::SessionId;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("identifier space exhausted for code pair {prefix}")]
    IdSpaceExhausted { prefix: String },
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("read failed for {key}: {reason}")]
    ReadFailed { key: String, reason: String },

    #[error("write failed for {key}: {reason}")]
    WriteFailed { key: String, reason: String },

    #[error("remove failed for {key}: {reason}")]
    RemoveFailed { key: String, reason: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("missing required field: {0}")]
    Validation(&'static str),

    #[error("no active session")]
    NoActiveSession,

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Error)]
pub enum RecoveryError {
    #[error("invalid session identifier: {0}")]
    InvalidIdentifier(String),

    #[error("no session found for {0}")]
    NotFound(SessionId),

    #[error("no draft pending a resume decision")]
    NoPendingDraft,

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
