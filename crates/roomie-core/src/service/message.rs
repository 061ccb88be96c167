//! Message service: validation in front of the message repository.
//!
//! `MessageService` enforces the store contract (non-empty content, distinct
//! known participants) and is what both the REST handlers and in-process
//! clients talk to. It implements [`MessageStore`] so a chat session can use
//! it directly without going over HTTP.

use roomie_types::error::StoreError;
use roomie_types::message::{Message, MessageId, NewMessage, ParticipantMessage};
use roomie_types::participant::{Participant, ParticipantId};
use tracing::debug;

use crate::repository::message::MessageRepository;
use crate::store::MessageStore;

/// Validating facade over a [`MessageRepository`].
pub struct MessageService<R: MessageRepository> {
    repo: R,
}

impl<R: MessageRepository> MessageService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Access the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Register a participant under a display name.
    pub async fn register_participant(&self, name: &str) -> Result<Participant, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::Validation("name must not be empty".to_string()));
        }
        Ok(self.repo.create_participant(name).await?)
    }

    /// Validate and persist a message.
    pub async fn send(&self, msg: &NewMessage) -> Result<Message, StoreError> {
        if msg.content.trim().is_empty() {
            return Err(StoreError::Validation("content must not be empty".to_string()));
        }
        if msg.sender_id == msg.receiver_id {
            return Err(StoreError::Validation(
                "sender and receiver must be different participants".to_string(),
            ));
        }
        self.require_participant(msg.sender_id).await?;
        self.require_participant(msg.receiver_id).await?;

        let stored = self.repo.insert_message(msg).await?;
        debug!(
            message_id = %stored.id,
            sender = %stored.sender_id,
            receiver = %stored.receiver_id,
            "message stored"
        );
        Ok(stored)
    }

    /// History between two participants, oldest first.
    pub async fn between(
        &self,
        a: ParticipantId,
        b: ParticipantId,
    ) -> Result<Vec<Message>, StoreError> {
        Ok(self.repo.messages_between(a, b).await?)
    }

    /// All messages of one participant, newest first.
    pub async fn for_user(&self, user: ParticipantId) -> Result<Vec<ParticipantMessage>, StoreError> {
        Ok(self.repo.messages_for_user(user).await?)
    }

    /// Mark a message as read by its receiver.
    pub async fn mark_read(
        &self,
        id: MessageId,
        reader: ParticipantId,
    ) -> Result<Message, StoreError> {
        self.repo
            .mark_read(id, reader)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn require_participant(&self, id: ParticipantId) -> Result<(), StoreError> {
        match self.repo.get_participant(id).await? {
            Some(_) => Ok(()),
            None => Err(StoreError::UnknownParticipant(id)),
        }
    }
}

impl<R: MessageRepository> MessageStore for MessageService<R> {
    async fn create_message(&self, msg: &NewMessage) -> Result<Message, StoreError> {
        self.send(msg).await
    }

    async fn list_messages_between(
        &self,
        a: ParticipantId,
        b: ParticipantId,
    ) -> Result<Vec<Message>, StoreError> {
        self.between(a, b).await
    }

    async fn list_messages_for_user(
        &self,
        user: ParticipantId,
    ) -> Result<Vec<ParticipantMessage>, StoreError> {
        self.for_user(user).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryRepository;

    async fn service_with_pair() -> (MessageService<InMemoryRepository>, ParticipantId, ParticipantId) {
        let service = MessageService::new(InMemoryRepository::default());
        let a = service.register_participant("Asha").await.unwrap().id;
        let b = service.register_participant("Ben").await.unwrap().id;
        (service, a, b)
    }

    fn new_message(sender: ParticipantId, receiver: ParticipantId, content: &str) -> NewMessage {
        NewMessage {
            sender_id: sender,
            receiver_id: receiver,
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn test_send_then_list_between_returns_message_once() {
        let (service, a, b) = service_with_pair().await;

        let stored = service.send(&new_message(a, b, "hello")).await.unwrap();
        let history = service.between(b, a).await.unwrap();

        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, stored.id);
        assert_eq!(history[0].content, "hello");
        assert_eq!(history[0].sender_id, a);
        assert_eq!(history[0].receiver_id, b);
    }

    #[tokio::test]
    async fn test_send_rejects_blank_content() {
        let (service, a, b) = service_with_pair().await;
        for content in ["", "   ", "\n\t"] {
            let err = service.send(&new_message(a, b, content)).await.unwrap_err();
            assert!(matches!(err, StoreError::Validation(_)));
        }
        assert!(service.between(a, b).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_send_rejects_self_addressed_message() {
        let (service, a, _) = service_with_pair().await;
        let err = service.send(&new_message(a, a, "note to self")).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_send_rejects_unknown_participant() {
        let (service, a, _) = service_with_pair().await;
        let err = service
            .send(&new_message(a, ParticipantId(999), "anyone?"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownParticipant(ParticipantId(999))));
    }

    #[tokio::test]
    async fn test_between_without_history_is_empty() {
        let (service, a, b) = service_with_pair().await;
        assert!(service.between(a, b).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_register_participant_requires_name() {
        let service = MessageService::new(InMemoryRepository::default());
        let err = service.register_participant("  ").await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_mark_read_missing_message() {
        let (service, a, _) = service_with_pair().await;
        let err = service.mark_read(MessageId(42), a).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn test_mark_read_only_by_receiver() {
        let (service, a, b) = service_with_pair().await;
        let stored = service.send(&new_message(a, b, "hi")).await.unwrap();

        let by_sender = service.mark_read(stored.id, a).await.unwrap();
        assert!(by_sender.read_at.is_none());

        let by_receiver = service.mark_read(stored.id, b).await.unwrap();
        assert!(by_receiver.read_at.is_some());

        let again = service.mark_read(stored.id, b).await.unwrap();
        assert_eq!(again.read_at, by_receiver.read_at);
    }
}
