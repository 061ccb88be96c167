//! Participant identity types.

use serde::{Deserialize, Serialize};

/// Stable identifier of a user taking part in conversations.
///
/// Assigned once by the message store and never reused for another person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub i64);

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ParticipantId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(ParticipantId)
    }
}

impl From<i64> for ParticipantId {
    fn from(id: i64) -> Self {
        ParticipantId(id)
    }
}

/// Deserialize a participant id sent either as a JSON number or as a
/// numeric string (`7` or `"7"`).
///
/// Browser clients pass ids through unchanged from wherever they read them,
/// so pushes relayed between peers may carry either form.
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<ParticipantId, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(id) => Ok(ParticipantId(id)),
        Raw::Text(text) => text
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid participant id: {text:?}"))),
    }
}

/// Identity object attached to listed messages (`{id, name}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
}
