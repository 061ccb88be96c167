//! Client-side view types for the chat session manager.
//!
//! These are derived, never persisted: the feed shown for the active
//! counterpart and the conversation list summarizing every counterpart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::message::MessageId;
use crate::participant::ParticipantId;

/// The other participant of the conversation being viewed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Counterpart {
    pub id: ParticipantId,
    pub name: String,
}

/// One entry of the conversation list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub counterpart_id: ParticipantId,
    pub counterpart_name: String,
    pub last_message: String,
    /// Display label produced by the display-timestamp rule.
    pub timestamp: String,
    pub unread: bool,
}

impl Conversation {
    pub fn counterpart(&self) -> Counterpart {
        Counterpart {
            id: self.counterpart_id,
            name: self.counterpart_name.clone(),
        }
    }
}

/// Identity of a feed entry, used for de-duplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum FeedKey {
    /// Entry backed by a persisted message.
    Stored(MessageId),
    /// Entry synthesized from a push that carried no message id.
    Local(u64),
}

/// A message as shown in the feed of the active conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedEntry {
    pub key: FeedKey,
    pub content: String,
    pub sent_at: DateTime<Utc>,
    /// Display label produced by the display-timestamp rule.
    pub timestamp: String,
    pub is_sender: bool,
}

/// State of the chat view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No counterpart selected.
    Idle,
    /// Counterpart selected, history fetch in flight.
    Loading { counterpart: Counterpart, epoch: u64 },
    /// History loaded, room joined.
    Active { counterpart: Counterpart },
}

impl SessionState {
    pub fn counterpart(&self) -> Option<&Counterpart> {
        match self {
            SessionState::Idle => None,
            SessionState::Loading { counterpart, .. } | SessionState::Active { counterpart } => {
                Some(counterpart)
            }
        }
    }
}
