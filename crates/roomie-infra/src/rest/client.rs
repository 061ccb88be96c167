//! HttpMessageStore -- [`MessageStore`] implementation over the Roomie REST API.
//!
//! Talks to `{base_url}/api/v1` and unwraps the response envelope. Error
//! envelopes are mapped back onto [`StoreError`] by HTTP status and error
//! code; connection failures and unreadable bodies become
//! [`StoreError::Unavailable`].

use std::time::Duration;

use roomie_core::store::MessageStore;
use roomie_types::config::ClientConfig;
use roomie_types::error::StoreError;
use roomie_types::message::{Message, MessageId, NewMessage, ParticipantMessage};
use roomie_types::participant::{Participant, ParticipantId};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

/// Error code the server uses for an unknown sender or receiver.
const PARTICIPANT_NOT_FOUND: &str = "PARTICIPANT_NOT_FOUND";

/// REST client for the message store.
#[derive(Clone)]
pub struct HttpMessageStore {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    code: String,
    message: String,
    #[serde(default)]
    details: Option<serde_json::Value>,
}

impl HttpMessageStore {
    /// Create a client for the server at `base_url` (e.g. `http://127.0.0.1:8000`).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Unavailable(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, StoreError> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Register a participant (`POST /participants`).
    pub async fn register_participant(&self, name: &str) -> Result<Participant, StoreError> {
        self.execute(self.client.post(self.url("/participants")).json(&json!({ "name": name })))
            .await
    }

    /// Mark a message read on behalf of its receiver (`POST /messages/{id}/read`).
    pub async fn mark_read(
        &self,
        id: MessageId,
        reader: ParticipantId,
    ) -> Result<Message, StoreError> {
        self.execute(
            self.client
                .post(self.url(&format!("/messages/{id}/read")))
                .json(&json!({ "readerId": reader })),
        )
        .await
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, StoreError> {
        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        let envelope: Envelope<T> = response.json().await.map_err(|e| {
            StoreError::Unavailable(format!("failed to parse response (HTTP {status}): {e}"))
        })?;

        if status.is_success() {
            return envelope
                .data
                .ok_or_else(|| StoreError::Unavailable("response envelope has no data".to_string()));
        }

        let detail = envelope.errors.into_iter().next();
        let message = detail
            .as_ref()
            .map(|d| d.message.clone())
            .unwrap_or_else(|| format!("HTTP {status}"));

        Err(match status.as_u16() {
            400 => StoreError::Validation(message),
            404 => match detail.as_ref().and_then(unknown_participant) {
                Some(id) => StoreError::UnknownParticipant(id),
                None => StoreError::NotFound,
            },
            _ => StoreError::Storage(message),
        })
    }
}

fn unknown_participant(detail: &ErrorDetail) -> Option<ParticipantId> {
    if detail.code != PARTICIPANT_NOT_FOUND {
        return None;
    }
    detail
        .details
        .as_ref()?
        .get("participantId")?
        .as_i64()
        .map(ParticipantId)
}

impl MessageStore for HttpMessageStore {
    async fn create_message(&self, msg: &NewMessage) -> Result<Message, StoreError> {
        self.execute(self.client.post(self.url("/messages")).json(msg)).await
    }

    async fn list_messages_between(
        &self,
        a: ParticipantId,
        b: ParticipantId,
    ) -> Result<Vec<Message>, StoreError> {
        self.execute(
            self.client
                .post(self.url(&format!("/messages/between/{a}")))
                .json(&json!({ "receiverId": b })),
        )
        .await
    }

    async fn list_messages_for_user(
        &self,
        user: ParticipantId,
    ) -> Result<Vec<ParticipantMessage>, StoreError> {
        self.execute(self.client.get(self.url(&format!("/messages/for/{user}"))))
            .await
    }
}
