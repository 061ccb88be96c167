//! In-memory test doubles shared by the unit tests of this crate.

use std::sync::Mutex;

use chrono::Utc;
use roomie_types::error::RepositoryError;
use roomie_types::message::{Message, MessageId, NewMessage, ParticipantMessage};
use roomie_types::participant::{Participant, ParticipantId};

use crate::repository::message::MessageRepository;

#[derive(Default)]
struct Inner {
    participants: Vec<Participant>,
    messages: Vec<Message>,
}

/// Vec-backed `MessageRepository` with the same ordering rules as SQLite.
#[derive(Default)]
pub struct InMemoryRepository {
    inner: Mutex<Inner>,
}

impl InMemoryRepository {
    fn participant(inner: &Inner, id: ParticipantId) -> Result<Participant, RepositoryError> {
        inner
            .participants
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }
}

impl MessageRepository for InMemoryRepository {
    async fn create_participant(&self, name: &str) -> Result<Participant, RepositoryError> {
        let mut inner = self.inner.lock().unwrap();
        let participant = Participant {
            id: ParticipantId(inner.participants.len() as i64 + 1),
            name: name.to_string(),
        };
        inner.participants.push(participant.clone());
        Ok(participant)
    }

    async fn get_participant(
        &self,
        id: ParticipantId,
    ) -> Result<Option<Participant>, RepositoryError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.participants.iter().find(|p| p.id == id).cloned())
    }

    async fn insert_message(&self, msg: &NewMessage) -> Result<Message, RepositoryError> {
        let mut inner = self.inner.lock().unwrap();
        let message = Message {
            id: MessageId(inner.messages.len() as i64 + 1),
            sender_id: msg.sender_id,
            receiver_id: msg.receiver_id,
            content: msg.content.clone(),
            sent_at: Utc::now(),
            read_at: None,
        };
        inner.messages.push(message.clone());
        Ok(message)
    }

    async fn messages_between(
        &self,
        a: ParticipantId,
        b: ParticipantId,
    ) -> Result<Vec<Message>, RepositoryError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .messages
            .iter()
            .filter(|m| {
                (m.sender_id == a && m.receiver_id == b) || (m.sender_id == b && m.receiver_id == a)
            })
            .cloned()
            .collect())
    }

    async fn messages_for_user(
        &self,
        user: ParticipantId,
    ) -> Result<Vec<ParticipantMessage>, RepositoryError> {
        let inner = self.inner.lock().unwrap();
        let mut listed = Vec::new();
        for m in inner.messages.iter().rev() {
            if m.sender_id != user && m.receiver_id != user {
                continue;
            }
            listed.push(ParticipantMessage {
                message: m.clone(),
                sender: Self::participant(&inner, m.sender_id)?,
                receiver: Self::participant(&inner, m.receiver_id)?,
            });
        }
        Ok(listed)
    }

    async fn mark_read(
        &self,
        id: MessageId,
        reader: ParticipantId,
    ) -> Result<Option<Message>, RepositoryError> {
        let mut inner = self.inner.lock().unwrap();
        let Some(message) = inner.messages.iter_mut().find(|m| m.id == id) else {
            return Ok(None);
        };
        if message.receiver_id == reader && message.read_at.is_none() {
            message.read_at = Some(Utc::now());
        }
        Ok(Some(message.clone()))
    }
}
