//! Room relay: membership tracking and fan-out of push events.
//!
//! Each connected transport endpoint gets a bounded `mpsc` mailbox. Rooms are
//! sets of connection ids. Publishing on a room copies the payload into the
//! mailbox of every *other* member, verbatim, using `try_send` so a slow
//! peer never blocks the publisher. Nothing is queued for peers that are not
//! connected; the durable store is the recovery path.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use roomie_types::room::RoomId;
use roomie_types::wire::RelayPayload;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Default per-connection mailbox size.
pub const DEFAULT_MAILBOX_CAPACITY: usize = 256;

/// Relay-local handle for one connected endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// In-memory room membership and push fan-out.
///
/// All maps are `DashMap`s, so joins, leaves, publishes and disconnects from
/// many connection tasks can run in parallel. No shard guard is held while
/// delivering to mailboxes.
pub struct RoomRelay {
    /// connection -> mailbox sender
    mailboxes: DashMap<ConnectionId, mpsc::Sender<RelayPayload>>,
    /// room -> member connections
    rooms: DashMap<RoomId, HashSet<ConnectionId>>,
    /// connection -> rooms it joined (reverse index for disconnect)
    memberships: DashMap<ConnectionId, HashSet<RoomId>>,
    next_id: AtomicU64,
    mailbox_capacity: usize,
}

impl RoomRelay {
    pub fn new(mailbox_capacity: usize) -> Self {
        Self {
            mailboxes: DashMap::new(),
            rooms: DashMap::new(),
            memberships: DashMap::new(),
            next_id: AtomicU64::new(1),
            mailbox_capacity: mailbox_capacity.max(1),
        }
    }

    /// Register a new endpoint and return its id and mailbox.
    pub fn connect(&self) -> (ConnectionId, mpsc::Receiver<RelayPayload>) {
        let id = ConnectionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::channel(self.mailbox_capacity);
        self.mailboxes.insert(id, tx);
        debug!(connection = %id, "relay connection opened");
        (id, rx)
    }

    /// Whether `conn` is still connected.
    pub fn is_connected(&self, conn: ConnectionId) -> bool {
        self.mailboxes.contains_key(&conn)
    }

    /// Add `conn` to `room`. Idempotent.
    ///
    /// Other rooms the connection already belongs to are kept; callers that
    /// want single-room semantics must `leave` first.
    pub fn join(&self, conn: ConnectionId, room: &RoomId) {
        // The mailbox guard is held across the inserts so a concurrent
        // `disconnect` either runs first or sees (and removes) the membership.
        let Some(_mailbox) = self.mailboxes.get(&conn) else {
            warn!(connection = %conn, %room, "join from unknown connection ignored");
            return;
        };
        self.rooms.entry(room.clone()).or_default().insert(conn);
        self.memberships.entry(conn).or_default().insert(room.clone());
        debug!(connection = %conn, %room, "joined room");
    }

    /// Remove `conn` from `room`. Returns `true` if it was a member.
    pub fn leave(&self, conn: ConnectionId, room: &RoomId) -> bool {
        let removed = match self.rooms.get_mut(room) {
            Some(mut members) => members.remove(&conn),
            None => false,
        };
        self.rooms.remove_if(room, |_, members| members.is_empty());
        if let Some(mut rooms) = self.memberships.get_mut(&conn) {
            rooms.remove(room);
        }
        if removed {
            debug!(connection = %conn, %room, "left room");
        }
        removed
    }

    /// Deliver `payload` to every member of its room except `from`.
    ///
    /// Returns the number of mailboxes the payload was placed in. A room with
    /// no other members is a silent no-op. Full or closed mailboxes drop the
    /// payload for that recipient only.
    pub fn publish(&self, from: ConnectionId, payload: &RelayPayload) -> usize {
        let room = payload.room();
        // Snapshot the recipients so no room guard is held while sending.
        let recipients: Vec<ConnectionId> = match self.rooms.get(room) {
            Some(members) => members.iter().copied().filter(|c| *c != from).collect(),
            None => Vec::new(),
        };

        let mut delivered = 0;
        for conn in recipients {
            let Some(mailbox) = self.mailboxes.get(&conn).map(|tx| tx.clone()) else {
                continue;
            };
            match mailbox.try_send(payload.clone()) {
                Ok(()) => delivered += 1,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!(connection = %conn, %room, "mailbox full, dropping event");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    debug!(connection = %conn, %room, "mailbox closed, dropping event");
                }
            }
        }

        debug!(publisher = %from, %room, delivered, "relayed event");
        delivered
    }

    /// Drop the mailbox of `conn` and remove it from every room.
    pub fn disconnect(&self, conn: ConnectionId) {
        self.mailboxes.remove(&conn);
        if let Some((_, rooms)) = self.memberships.remove(&conn) {
            for room in rooms {
                if let Some(mut members) = self.rooms.get_mut(&room) {
                    members.remove(&conn);
                }
                self.rooms.remove_if(&room, |_, members| members.is_empty());
            }
        }
        debug!(connection = %conn, "relay connection closed");
    }

    /// Current members of `room`, sorted.
    pub fn members(&self, room: &RoomId) -> Vec<ConnectionId> {
        let mut members: Vec<ConnectionId> = self
            .rooms
            .get(room)
            .map(|m| m.iter().copied().collect())
            .unwrap_or_default();
        members.sort();
        members
    }

    /// Rooms `conn` currently belongs to.
    pub fn rooms_of(&self, conn: ConnectionId) -> Vec<RoomId> {
        let mut rooms: Vec<RoomId> = self
            .memberships
            .get(&conn)
            .map(|r| r.iter().cloned().collect())
            .unwrap_or_default();
        rooms.sort();
        rooms
    }

    pub fn connection_count(&self) -> usize {
        self.mailboxes.len()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

impl Default for RoomRelay {
    fn default() -> Self {
        Self::new(DEFAULT_MAILBOX_CAPACITY)
    }
}

impl std::fmt::Debug for RoomRelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoomRelay")
            .field("connections", &self.mailboxes.len())
            .field("rooms", &self.rooms.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use roomie_types::message::{MessageId, RelayEvent};
    use roomie_types::participant::ParticipantId;
    use serde_json::json;
    use std::sync::Arc;

    fn event(room: &RoomId, content: &str) -> RelayPayload {
        RelayPayload::from_event(&RelayEvent {
            room: room.clone(),
            content: content.to_string(),
            sender_id: ParticipantId(3),
            receiver_id: ParticipantId(7),
            message_id: None,
        })
        .unwrap()
    }

    fn pair_room() -> RoomId {
        RoomId::for_pair(ParticipantId(3), ParticipantId(7))
    }

    #[tokio::test]
    async fn publish_reaches_other_members_only() {
        let relay = RoomRelay::default();
        let room = pair_room();
        let (alice, mut alice_rx) = relay.connect();
        let (bob, mut bob_rx) = relay.connect();
        let (carol, mut carol_rx) = relay.connect();
        relay.join(alice, &room);
        relay.join(bob, &room);
        relay.join(carol, &RoomId::from_raw("1-2"));

        let sent = event(&room, "hello");
        let delivered = relay.publish(alice, &sent);
        assert_eq!(delivered, 1);

        assert_eq!(bob_rx.recv().await.unwrap(), sent);
        assert!(alice_rx.try_recv().is_err(), "publisher must not get its own event");
        assert!(carol_rx.try_recv().is_err(), "non-member must not get the event");
    }

    #[tokio::test]
    async fn scenario_three_sends_hello_to_seven() {
        let relay = RoomRelay::default();
        let room = RoomId::for_pair(ParticipantId(3), ParticipantId(7));
        assert_eq!(room.as_str(), "3-7");

        let (three, mut three_rx) = relay.connect();
        let (seven, mut seven_rx) = relay.connect();
        let (outsider, mut outsider_rx) = relay.connect();
        relay.join(three, &room);
        relay.join(seven, &room);

        let sent = RelayEvent {
            room: room.clone(),
            content: "hello".to_string(),
            sender_id: ParticipantId(3),
            receiver_id: ParticipantId(7),
            message_id: Some(MessageId(101)),
        };
        relay.publish(three, &RelayPayload::from_event(&sent).unwrap());

        let received = seven_rx.recv().await.unwrap();
        assert_eq!(received.to_event().unwrap(), sent);
        assert!(three_rx.try_recv().is_err());
        assert!(outsider_rx.try_recv().is_err());
        relay.disconnect(outsider);
    }

    #[test]
    fn publish_to_empty_room_is_noop() {
        let relay = RoomRelay::default();
        let room = pair_room();
        let (alice, _rx) = relay.connect();
        assert_eq!(relay.publish(alice, &event(&room, "anyone?")), 0);

        relay.join(alice, &room);
        assert_eq!(relay.publish(alice, &event(&room, "just me")), 0);
    }

    #[test]
    fn join_is_idempotent_and_keeps_other_rooms() {
        let relay = RoomRelay::default();
        let (conn, _rx) = relay.connect();
        let first = RoomId::from_raw("1-2");
        let second = RoomId::from_raw("1-3");

        relay.join(conn, &first);
        relay.join(conn, &first);
        relay.join(conn, &second);

        assert_eq!(relay.members(&first), vec![conn]);
        assert_eq!(relay.rooms_of(conn), vec![first, second]);
    }

    #[tokio::test]
    async fn leave_stops_delivery_and_prunes_room() {
        let relay = RoomRelay::default();
        let room = pair_room();
        let (alice, _alice_rx) = relay.connect();
        let (bob, mut bob_rx) = relay.connect();
        relay.join(alice, &room);
        relay.join(bob, &room);

        assert!(relay.leave(bob, &room));
        assert!(!relay.leave(bob, &room));
        assert_eq!(relay.publish(alice, &event(&room, "gone?")), 0);
        assert!(bob_rx.try_recv().is_err());

        assert!(relay.leave(alice, &room));
        assert_eq!(relay.room_count(), 0);
    }

    #[test]
    fn disconnect_removes_all_memberships() {
        let relay = RoomRelay::default();
        let (conn, _rx) = relay.connect();
        let (other, _other_rx) = relay.connect();
        let first = RoomId::from_raw("1-2");
        let second = RoomId::from_raw("1-3");
        relay.join(conn, &first);
        relay.join(conn, &second);
        relay.join(other, &second);

        relay.disconnect(conn);

        assert!(!relay.is_connected(conn));
        assert!(relay.rooms_of(conn).is_empty());
        assert!(relay.members(&first).is_empty());
        assert_eq!(relay.members(&second), vec![other]);
        assert_eq!(relay.room_count(), 1);
        assert_eq!(relay.connection_count(), 1);
    }

    #[test]
    fn join_after_disconnect_is_ignored() {
        let relay = RoomRelay::default();
        let (conn, _rx) = relay.connect();
        relay.disconnect(conn);
        relay.join(conn, &pair_room());
        assert_eq!(relay.room_count(), 0);
    }

    #[test]
    fn full_mailbox_drops_without_blocking() {
        let relay = RoomRelay::new(1);
        let room = pair_room();
        let (alice, _alice_rx) = relay.connect();
        let (bob, mut bob_rx) = relay.connect();
        relay.join(alice, &room);
        relay.join(bob, &room);

        assert_eq!(relay.publish(alice, &event(&room, "one")), 1);
        assert_eq!(relay.publish(alice, &event(&room, "two")), 0);

        assert_eq!(bob_rx.try_recv().unwrap().body()["content"], "one");
        assert!(bob_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn concurrent_joins_are_not_lost() {
        let relay = Arc::new(RoomRelay::default());
        let room = pair_room();
        let mut handles = Vec::new();
        let mut receivers = Vec::new();

        for _ in 0..32 {
            let (conn, rx) = relay.connect();
            receivers.push(rx);
            let relay = Arc::clone(&relay);
            let room = room.clone();
            handles.push(tokio::spawn(async move { relay.join(conn, &room) }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(relay.members(&room).len(), 32);
        let (publisher, _rx) = relay.connect();
        assert_eq!(relay.publish(publisher, &event(&room, "all")), 32);
    }

    #[tokio::test]
    async fn foreign_payload_is_relayed_as_sent() {
        let relay = RoomRelay::default();
        let room = RoomId::from_raw("10-9");
        let (ten, _ten_rx) = relay.connect();
        let (nine, mut nine_rx) = relay.connect();
        relay.join(ten, &room);
        relay.join(nine, &room);

        let body = json!({
            "room": "10-9",
            "content": "hi",
            "senderId": "10",
            "receiverId": 9,
            "author": "Asha"
        });
        let sent = RelayPayload::from_value(body.clone()).unwrap();
        assert_eq!(relay.publish(ten, &sent), 1);

        assert_eq!(nine_rx.recv().await.unwrap().body(), &body);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn join_racing_disconnect_leaves_no_stale_membership() {
        let relay = Arc::new(RoomRelay::default());
        let room = pair_room();
        let mut handles = Vec::new();

        for _ in 0..200 {
            let (conn, rx) = relay.connect();
            let joiner = {
                let relay = Arc::clone(&relay);
                let room = room.clone();
                tokio::spawn(async move { relay.join(conn, &room) })
            };
            let leaver = {
                let relay = Arc::clone(&relay);
                tokio::spawn(async move {
                    relay.disconnect(conn);
                    drop(rx);
                })
            };
            handles.push(joiner);
            handles.push(leaver);
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(relay.connection_count(), 0);
        assert!(relay.members(&room).is_empty());
        assert_eq!(relay.room_count(), 0);
        assert!(relay.memberships.is_empty());
    }

    #[test]
    fn debug_impl() {
        let relay = RoomRelay::default();
        let _conn = relay.connect();
        let debug = format!("{relay:?}");
        assert!(debug.contains("RoomRelay"));
        assert!(debug.contains("connections"));
    }
}
