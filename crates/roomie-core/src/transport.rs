//! Client-side real-time transport port.
//!
//! The chat session manager only issues room joins/leaves and publishes;
//! incoming pushes are fed to it by whoever owns the transport's receive
//! side. Every call is fire-and-forget and never suspends the caller.

use std::sync::Arc;

use roomie_types::error::TransportError;
use roomie_types::message::RelayEvent;
use roomie_types::room::RoomId;
use roomie_types::wire::RelayPayload;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tracing::warn;

use crate::relay::{ConnectionId, RoomRelay};

/// Publish/subscribe channel as seen by one connected client.
pub trait Transport: Send + Sync {
    fn join_room(&self, room: &RoomId) -> Result<(), TransportError>;

    fn leave_room(&self, room: &RoomId) -> Result<(), TransportError>;

    fn publish(&self, event: &RelayEvent) -> Result<(), TransportError>;
}

impl<T: Transport> Transport for Arc<T> {
    fn join_room(&self, room: &RoomId) -> Result<(), TransportError> {
        (**self).join_room(room)
    }

    fn leave_room(&self, room: &RoomId) -> Result<(), TransportError> {
        (**self).leave_room(room)
    }

    fn publish(&self, event: &RelayEvent) -> Result<(), TransportError> {
        (**self).publish(event)
    }
}

/// Transport attached directly to an in-process [`RoomRelay`].
///
/// Used when client and relay share a process (tests, embedded use).
pub struct LocalTransport {
    relay: Arc<RoomRelay>,
    conn: ConnectionId,
}

impl LocalTransport {
    /// Open a connection on `relay`, returning the transport and its mailbox.
    pub fn connect(relay: Arc<RoomRelay>) -> (Self, LocalMailbox) {
        let (conn, rx) = relay.connect();
        (Self { relay, conn }, LocalMailbox { conn, rx })
    }

    pub fn connection_id(&self) -> ConnectionId {
        self.conn
    }

    fn ensure_connected(&self) -> Result<(), TransportError> {
        if self.relay.is_connected(self.conn) {
            Ok(())
        } else {
            Err(TransportError::Disconnected)
        }
    }
}

impl Transport for LocalTransport {
    fn join_room(&self, room: &RoomId) -> Result<(), TransportError> {
        self.ensure_connected()?;
        self.relay.join(self.conn, room);
        Ok(())
    }

    fn leave_room(&self, room: &RoomId) -> Result<(), TransportError> {
        self.ensure_connected()?;
        self.relay.leave(self.conn, room);
        Ok(())
    }

    fn publish(&self, event: &RelayEvent) -> Result<(), TransportError> {
        self.ensure_connected()?;
        let payload =
            RelayPayload::from_event(event).map_err(|e| TransportError::Rejected(e.to_string()))?;
        self.relay.publish(self.conn, &payload);
        Ok(())
    }
}

/// Receive side of a [`LocalTransport`], decoding relayed payloads.
///
/// Payloads that do not decode as a [`RelayEvent`] are logged and skipped.
pub struct LocalMailbox {
    conn: ConnectionId,
    rx: mpsc::Receiver<RelayPayload>,
}

impl LocalMailbox {
    /// Wait for the next event. `None` once the connection is gone.
    pub async fn recv(&mut self) -> Option<RelayEvent> {
        loop {
            let payload = self.rx.recv().await?;
            if let Some(event) = self.decode(&payload) {
                return Some(event);
            }
        }
    }

    pub fn try_recv(&mut self) -> Result<RelayEvent, TryRecvError> {
        loop {
            let payload = self.rx.try_recv()?;
            if let Some(event) = self.decode(&payload) {
                return Ok(event);
            }
        }
    }

    fn decode(&self, payload: &RelayPayload) -> Option<RelayEvent> {
        match payload.to_event() {
            Ok(event) => Some(event),
            Err(err) => {
                warn!(connection = %self.conn, room = %payload.room(), error = %err, "skipping undecodable push");
                None
            }
        }
    }
}

impl Drop for LocalTransport {
    fn drop(&mut self) {
        self.relay.disconnect(self.conn);
    }
}
