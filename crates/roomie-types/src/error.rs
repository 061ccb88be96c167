use thiserror::Error;

use crate::participant::ParticipantId;

/// Errors surfaced by the message store contract.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("participant {0} not found")]
    UnknownParticipant(ParticipantId),

    #[error("message not found")]
    NotFound,

    #[error("storage error: {0}")]
    Storage(String),

    /// The store could not be reached (network failure, bad response).
    #[error("message store unavailable: {0}")]
    Unavailable(String),
}

impl From<RepositoryError> for StoreError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => StoreError::NotFound,
            other => StoreError::Storage(other.to_string()),
        }
    }
}

/// Errors from the real-time transport.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport disconnected")]
    Disconnected,

    #[error("transport rejected event: {0}")]
    Rejected(String),
}

/// Errors returned by the chat session manager to the user-facing layer.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("no conversation is ready for sending")]
    NotActive,

    #[error("message failed to send: {0}")]
    Store(#[from] StoreError),
}

/// Errors from repository operations (used by trait definitions in roomie-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}
