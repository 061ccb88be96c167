//! HTTP request handlers for the REST API and the WebSocket relay.

pub mod message;
pub mod participant;
pub mod ws;

use serde::Deserialize;

use roomie_types::participant::ParticipantId;

use crate::http::error::AppError;

/// A participant id as clients send it: a JSON number or a numeric string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum IdInput {
    Number(i64),
    Text(String),
}

impl IdInput {
    fn parse(self, field: &str) -> Result<ParticipantId, AppError> {
        match self {
            IdInput::Number(n) => Ok(ParticipantId(n)),
            IdInput::Text(s) => parse_id(&s, field),
        }
    }
}

/// Parse a path or body id, rejecting non-numeric input as a validation error.
pub fn parse_id(raw: &str, field: &str) -> Result<ParticipantId, AppError> {
    raw.parse::<ParticipantId>()
        .map_err(|_| AppError::Validation(format!("{field} must be a numeric id, got '{raw}'")))
}

/// Required id field from a request body.
pub fn require_id(value: Option<IdInput>, field: &str) -> Result<ParticipantId, AppError> {
    value
        .ok_or_else(|| AppError::Validation(format!("{field} is required")))?
        .parse(field)
}
