//! Message store contract consumed by the chat session manager.
//!
//! Implemented in-process by [`MessageService`](crate::service::message::MessageService)
//! and remotely by the REST client in roomie-infra.

use std::sync::Arc;

use roomie_types::error::StoreError;
use roomie_types::message::{Message, NewMessage, ParticipantMessage};
use roomie_types::participant::ParticipantId;

/// Durable message persistence as seen by a client.
pub trait MessageStore: Send + Sync {
    /// Persist a message. Fails with `StoreError::Validation` on empty
    /// content or a self-addressed message.
    fn create_message(
        &self,
        msg: &NewMessage,
    ) -> impl std::future::Future<Output = Result<Message, StoreError>> + Send;

    /// Every message between `a` and `b` in either direction.
    ///
    /// A pair with no history yields an empty vec, not an error.
    fn list_messages_between(
        &self,
        a: ParticipantId,
        b: ParticipantId,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, StoreError>> + Send;

    /// Every message sent or received by `user`, newest first, with the
    /// sender and receiver identities attached.
    fn list_messages_for_user(
        &self,
        user: ParticipantId,
    ) -> impl std::future::Future<Output = Result<Vec<ParticipantMessage>, StoreError>> + Send;
}

impl<S: MessageStore> MessageStore for Arc<S> {
    fn create_message(
        &self,
        msg: &NewMessage,
    ) -> impl std::future::Future<Output = Result<Message, StoreError>> + Send {
        (**self).create_message(msg)
    }

    fn list_messages_between(
        &self,
        a: ParticipantId,
        b: ParticipantId,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, StoreError>> + Send {
        (**self).list_messages_between(a, b)
    }

    fn list_messages_for_user(
        &self,
        user: ParticipantId,
    ) -> impl std::future::Future<Output = Result<Vec<ParticipantMessage>, StoreError>> + Send {
        (**self).list_messages_for_user(user)
    }
}
