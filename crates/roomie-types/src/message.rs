//! Direct message domain types.
//!
//! `Message` is the persisted row, `ParticipantMessage` is the listing form
//! with sender/receiver identities attached, and `RelayEvent` is the push
//! payload fanned out to the peer over the real-time transport.
//!
//! JSON field names are camelCase to match the REST and WebSocket contracts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::participant::{self, Participant, ParticipantId};
use crate::room::RoomId;

/// Store-assigned message id. Monotonic with creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub i64);

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted direct message.
///
/// Immutable once created, except `read_at` which moves from unset to set
/// exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub sender_id: ParticipantId,
    pub receiver_id: ParticipantId,
    pub content: String,
    pub sent_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_at: Option<DateTime<Utc>>,
}

impl Message {
    /// The participant on the other side of this message, seen from `viewer`.
    pub fn counterpart_of(&self, viewer: ParticipantId) -> ParticipantId {
        if self.sender_id == viewer {
            self.receiver_id
        } else {
            self.sender_id
        }
    }
}

/// Input to the store's create call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessage {
    pub sender_id: ParticipantId,
    pub receiver_id: ParticipantId,
    pub content: String,
}

/// A message listed for one user, with both identities attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantMessage {
    #[serde(flatten)]
    pub message: Message,
    pub sender: Participant,
    pub receiver: Participant,
}

impl ParticipantMessage {
    /// The identity of the other side, seen from `viewer`.
    pub fn counterpart_of(&self, viewer: ParticipantId) -> &Participant {
        if self.sender.id == viewer {
            &self.receiver
        } else {
            &self.sender
        }
    }
}

/// Typed view of a push payload, as produced and consumed by chat clients.
///
/// The relay itself never decodes this; it forwards the raw
/// [`RelayPayload`](crate::wire::RelayPayload). Ids may arrive as numbers or
/// numeric strings, and unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayEvent {
    pub room: RoomId,
    pub content: String,
    #[serde(deserialize_with = "participant::deserialize_lenient")]
    pub sender_id: ParticipantId,
    #[serde(deserialize_with = "participant::deserialize_lenient")]
    pub receiver_id: ParticipantId,
    /// Store-assigned id of the message this event mirrors, when known.
    /// Receivers use it to avoid showing the same message twice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<MessageId>,
}

impl RelayEvent {
    /// Build the push event mirroring a persisted message.
    pub fn for_message(message: &Message) -> Self {
        Self {
            room: RoomId::for_pair(message.sender_id, message.receiver_id),
            content: message.content.clone(),
            sender_id: message.sender_id,
            receiver_id: message.receiver_id,
            message_id: Some(message.id),
        }
    }
}
