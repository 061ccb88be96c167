//! Message repository trait definition.
//!
//! Defines the storage interface for participants and direct messages. The
//! infrastructure layer (roomie-infra) implements this trait with SQLite
//! persistence.

use roomie_types::error::RepositoryError;
use roomie_types::message::{Message, MessageId, NewMessage, ParticipantMessage};
use roomie_types::participant::{Participant, ParticipantId};

/// Repository trait for participant and message persistence.
///
/// Performs no validation beyond what the schema enforces; callers go
/// through `MessageService` for that.
///
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait MessageRepository: Send + Sync {
    // -----------------------------------------------------------------------
    // Participants
    // -----------------------------------------------------------------------

    /// Register a participant and return it with its assigned id.
    fn create_participant(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Result<Participant, RepositoryError>> + Send;

    /// Look up a participant by id.
    fn get_participant(
        &self,
        id: ParticipantId,
    ) -> impl std::future::Future<Output = Result<Option<Participant>, RepositoryError>> + Send;

    // -----------------------------------------------------------------------
    // Messages
    // -----------------------------------------------------------------------

    /// Persist a message, assigning its id and `sent_at`.
    fn insert_message(
        &self,
        msg: &NewMessage,
    ) -> impl std::future::Future<Output = Result<Message, RepositoryError>> + Send;

    /// Messages exchanged between `a` and `b` in either direction, ordered by id ASC.
    fn messages_between(
        &self,
        a: ParticipantId,
        b: ParticipantId,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, RepositoryError>> + Send;

    /// Every message sent or received by `user`, with identities attached,
    /// ordered by id DESC (newest first).
    fn messages_for_user(
        &self,
        user: ParticipantId,
    ) -> impl std::future::Future<Output = Result<Vec<ParticipantMessage>, RepositoryError>> + Send;

    /// Set `read_at` on a message addressed to `reader`.
    ///
    /// Returns `None` if the message does not exist. A message that is already
    /// read, or not addressed to `reader`, is returned unchanged.
    fn mark_read(
        &self,
        id: MessageId,
        reader: ParticipantId,
    ) -> impl std::future::Future<Output = Result<Option<Message>, RepositoryError>> + Send;
}
