//! Room identifiers for two-party real-time channels.
//!
//! A room name is derived from the unordered pair of participant ids: the
//! decimal forms of the ids are sorted as strings and joined with a single
//! hyphen, so both sides of a conversation compute the same room no matter
//! who opens it first. String order matches browser clients, which build the
//! name with a default `Array.sort()` (`9` and `10` give `"10-9"`).

use serde::{Deserialize, Serialize};

use crate::participant::ParticipantId;

/// Name of a broadcast channel scoped to one pair of participants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Derive the room shared by `a` and `b`.
    pub fn for_pair(a: ParticipantId, b: ParticipantId) -> Self {
        let (a, b) = (a.to_string(), b.to_string());
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        RoomId(format!("{first}-{second}"))
    }

    /// Wrap a raw room name received over the wire.
    ///
    /// The relay treats room names as opaque strings; it does not require
    /// them to be in pair form.
    pub fn from_raw(name: impl Into<String>) -> Self {
        RoomId(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
