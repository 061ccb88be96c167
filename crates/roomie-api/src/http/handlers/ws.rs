//! WebSocket endpoint exposing the room relay.
//!
//! The `/ws` endpoint upgrades an HTTP connection to a WebSocket and
//! registers it with the [`RoomRelay`]. Once connected, the handler:
//!
//! - **Forwards events:** every payload placed in this connection's mailbox
//!   is pushed to the client as a `receive_message` frame, with `data`
//!   exactly as the publisher sent it.
//! - **Receives frames:** `join_room`, `leave_room`, `send_message` and
//!   `ping` are applied to the relay. Malformed frames are logged and ignored.
//!
//! Closing the socket removes the connection from every room it joined.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};

use roomie_core::relay::{ConnectionId, RoomRelay};
use roomie_types::wire::{ClientFrame, ServerFrame};

use crate::state::AppState;

/// Upgrade an HTTP request to a relay connection.
///
/// This is mounted at `/ws` in the router.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws_connection(socket, state))
}

/// Core WebSocket connection handler.
///
/// Multiplexes the relay mailbox and incoming client frames in a single
/// task with `tokio::select!`, so replies such as `pong` share the sender.
async fn handle_ws_connection(socket: WebSocket, state: AppState) {
    let relay = state.relay;
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let (conn, mut mailbox) = relay.connect();

    loop {
        tokio::select! {
            // --- Branch 1: Forward relayed events to the client ---
            payload = mailbox.recv() => {
                let Some(payload) = payload else {
                    // Mailbox dropped: the relay disconnected us.
                    break;
                };
                if send_frame(&mut ws_sender, &ServerFrame::ReceiveMessage(payload)).await.is_err() {
                    break;
                }
            }

            // --- Branch 2: Apply frames from the client ---
            msg_result = ws_receiver.next() => {
                match msg_result {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(reply) = handle_frame(&relay, conn, text.as_str()) {
                            if send_frame(&mut ws_sender, &reply).await.is_err() {
                                break;
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(err)) => {
                        tracing::debug!(connection = %conn, "WebSocket receive error: {err}");
                        break;
                    }
                    // Binary and protocol ping/pong frames are handled by axum.
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    relay.disconnect(conn);
    tracing::debug!(connection = %conn, "WebSocket connection closed");
}

/// Apply one client frame to the relay, returning the reply to send, if any.
fn handle_frame(relay: &RoomRelay, conn: ConnectionId, text: &str) -> Option<ServerFrame> {
    let frame: ClientFrame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(err) => {
            tracing::warn!(
                connection = %conn,
                raw = %text,
                error = %err,
                "Ignoring malformed WebSocket frame"
            );
            return None;
        }
    };

    match frame {
        ClientFrame::JoinRoom(room) => {
            relay.join(conn, &room);
            None
        }
        ClientFrame::LeaveRoom(room) => {
            relay.leave(conn, &room);
            None
        }
        ClientFrame::SendMessage(payload) => {
            relay.publish(conn, &payload);
            None
        }
        ClientFrame::Ping => Some(ServerFrame::Pong),
    }
}

async fn send_frame(
    ws_sender: &mut (impl SinkExt<Message, Error = axum::Error> + Unpin),
    frame: &ServerFrame,
) -> Result<(), axum::Error> {
    match serde_json::to_string(frame) {
        Ok(json) => ws_sender.send(Message::Text(json.into())).await,
        Err(err) => {
            tracing::warn!("Failed to serialize relay frame: {err}");
            Ok(())
        }
    }
}
