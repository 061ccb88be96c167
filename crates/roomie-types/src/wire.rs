//! WebSocket frames exchanged between clients and the room relay.
//!
//! Every frame is a JSON text message of the form
//! `{"event": "<name>", "data": <payload>}`; frames without a payload omit
//! `data`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::message::RelayEvent;
use crate::room::RoomId;

/// A published payload as the relay sees it.
///
/// Only the `room` string is read, for routing. The rest of the object is
/// kept as received and re-emitted unchanged, so clients may add fields or
/// use their own id encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayPayload {
    room: RoomId,
    body: Value,
}

impl RelayPayload {
    /// Wrap a raw JSON payload. It must be an object with a string `room`.
    pub fn from_value(body: Value) -> Result<Self, serde_json::Error> {
        let room = match body.get("room").and_then(Value::as_str) {
            Some(room) => RoomId::from_raw(room),
            None => {
                return Err(serde::de::Error::custom(
                    "relay payload must be an object with a string `room`",
                ));
            }
        };
        Ok(Self { room, body })
    }

    /// Encode a typed event for publishing.
    pub fn from_event(event: &RelayEvent) -> Result<Self, serde_json::Error> {
        Self::from_value(serde_json::to_value(event)?)
    }

    /// Decode the payload as a typed event.
    pub fn to_event(&self) -> Result<RelayEvent, serde_json::Error> {
        RelayEvent::deserialize(&self.body)
    }

    pub fn room(&self) -> &RoomId {
        &self.room
    }

    pub fn body(&self) -> &Value {
        &self.body
    }
}

impl Serialize for RelayPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.body.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RelayPayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let body = Value::deserialize(deserializer)?;
        Self::from_value(body).map_err(serde::de::Error::custom)
    }
}

/// Frame sent by a client to the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientFrame {
    JoinRoom(RoomId),
    LeaveRoom(RoomId),
    /// Publish to the payload's `room`; the sender is not echoed.
    SendMessage(RelayPayload),
    Ping,
}

/// Frame sent by the relay to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerFrame {
    ReceiveMessage(RelayPayload),
    Pong,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::participant::ParticipantId;
    use serde_json::json;

    #[test]
    fn join_room_frame_shape() {
        let frame: ClientFrame =
            serde_json::from_value(json!({"event": "join_room", "data": "3-7"})).unwrap();
        assert_eq!(frame, ClientFrame::JoinRoom(RoomId::from_raw("3-7")));
    }

    #[test]
    fn send_message_frame_keeps_the_payload_untouched() {
        let data = json!({
            "room": "10-9",
            "content": "Hello",
            "senderId": "10",
            "receiverId": 9,
            "author": "Asha"
        });
        let frame: ClientFrame =
            serde_json::from_value(json!({"event": "send_message", "data": data.clone()})).unwrap();

        let ClientFrame::SendMessage(payload) = frame else {
            panic!("expected send_message, got {frame:?}");
        };
        assert_eq!(payload.room().as_str(), "10-9");
        assert_eq!(payload.body(), &data);

        let event = payload.to_event().unwrap();
        assert_eq!(event.sender_id, ParticipantId(10));
        assert_eq!(event.message_id, None);
    }

    #[test]
    fn payload_without_string_room_is_rejected() {
        for data in [json!({"content": "hi"}), json!({"room": 37}), json!("3-7")] {
            let frame = json!({"event": "send_message", "data": data});
            assert!(serde_json::from_value::<ClientFrame>(frame).is_err());
        }
    }

    #[test]
    fn ping_needs_no_data() {
        let frame: ClientFrame = serde_json::from_str(r#"{"event":"ping"}"#).unwrap();
        assert_eq!(frame, ClientFrame::Ping);
    }

    #[test]
    fn server_frames_serialize_with_event_tag() {
        assert_eq!(serde_json::to_value(ServerFrame::Pong).unwrap(), json!({"event": "pong"}));

        let event = RelayEvent {
            room: RoomId::from_raw("3-7"),
            content: "Hello".to_string(),
            sender_id: ParticipantId(3),
            receiver_id: ParticipantId(7),
            message_id: None,
        };
        let payload = RelayPayload::from_event(&event).unwrap();
        let value = serde_json::to_value(ServerFrame::ReceiveMessage(payload)).unwrap();
        assert_eq!(value["event"], "receive_message");
        assert_eq!(value["data"], json!({"room": "3-7", "content": "Hello", "senderId": 3, "receiverId": 7}));
    }

    #[test]
    fn unknown_event_is_rejected() {
        assert!(serde_json::from_str::<ClientFrame>(r#"{"event":"shout","data":"x"}"#).is_err());
    }
}
