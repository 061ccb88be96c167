//! Chat session manager for one signed-in participant.
//!
//! Owns the live feed of the selected conversation and the conversation
//! list. Every input (counterpart selection, history results, sends, pushes)
//! is applied serially through `&mut self`; the owner decides how to
//! schedule them.
//!
//! Selecting a counterpart joins its room immediately and returns a
//! [`HistoryRequest`] tagged with a selection epoch. History results are only
//! applied if their epoch is still current, so a slow fetch for a previous
//! counterpart can never overwrite the feed of the current one.

use chrono::Utc;
use roomie_types::chat::{Conversation, Counterpart, FeedEntry, FeedKey, SessionState};
use roomie_types::error::{ChatError, StoreError};
use roomie_types::message::{Message, NewMessage, RelayEvent};
use roomie_types::participant::ParticipantId;
use roomie_types::room::RoomId;
use tracing::{debug, warn};

use crate::chat::conversation::{fold_conversations, touch_conversation};
use crate::chat::display::local_display_timestamp;
use crate::store::MessageStore;
use crate::transport::Transport;

/// A pending history fetch issued by [`ChatSession::select_counterpart`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    epoch: u64,
    counterpart: Counterpart,
}

impl HistoryRequest {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn counterpart(&self) -> &Counterpart {
        &self.counterpart
    }
}

/// Session manager: Idle -> Loading -> Active per selected counterpart.
pub struct ChatSession<S: MessageStore, T: Transport> {
    me: ParticipantId,
    store: S,
    transport: T,
    state: SessionState,
    room: Option<RoomId>,
    epoch: u64,
    feed: Vec<FeedEntry>,
    conversations: Vec<Conversation>,
    next_local_key: u64,
}

impl<S: MessageStore, T: Transport> ChatSession<S, T> {
    pub fn new(me: ParticipantId, store: S, transport: T) -> Self {
        Self {
            me,
            store,
            transport,
            state: SessionState::Idle,
            room: None,
            epoch: 0,
            feed: Vec::new(),
            conversations: Vec::new(),
            next_local_key: 0,
        }
    }

    pub fn me(&self) -> ParticipantId {
        self.me
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn feed(&self) -> &[FeedEntry] {
        &self.feed
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn active_counterpart(&self) -> Option<&Counterpart> {
        self.state.counterpart()
    }

    /// Room currently joined on the transport, if any.
    pub fn current_room(&self) -> Option<&RoomId> {
        self.room.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // --- Conversation selection ---

    /// Switch the view to `counterpart`.
    ///
    /// Leaves the previous room, joins the pair room, clears the feed and
    /// enters `Loading`. Transport failures are logged; history from the
    /// store remains the fallback.
    pub fn select_counterpart(&mut self, counterpart: Counterpart) -> HistoryRequest {
        let room = RoomId::for_pair(self.me, counterpart.id);

        if let Some(previous) = self.room.take() {
            if previous != room {
                self.leave(&previous);
            }
        }
        if let Err(err) = self.transport.join_room(&room) {
            warn!(%room, error = %err, "room join failed, live updates unavailable");
        }
        self.room = Some(room);

        self.epoch += 1;
        self.feed.clear();
        self.state = SessionState::Loading {
            counterpart: counterpart.clone(),
            epoch: self.epoch,
        };
        debug!(counterpart = %counterpart.id, epoch = self.epoch, "counterpart selected");

        HistoryRequest {
            epoch: self.epoch,
            counterpart,
        }
    }

    /// Fetch the history a [`HistoryRequest`] asks for.
    pub async fn fetch_history(&self, request: &HistoryRequest) -> Result<Vec<Message>, StoreError> {
        self.store
            .list_messages_between(self.me, request.counterpart.id)
            .await
    }

    /// Apply a history result.
    ///
    /// Returns `Ok(false)` and changes nothing if the request is stale. On
    /// success the feed becomes the history, in store order, followed by any
    /// pushes that arrived while loading and are not part of the history. A
    /// failed fetch still activates the view and is handed back to the caller.
    pub fn apply_history(
        &mut self,
        request: HistoryRequest,
        result: Result<Vec<Message>, StoreError>,
    ) -> Result<bool, StoreError> {
        let current = matches!(
            &self.state,
            SessionState::Loading { epoch, .. } if *epoch == request.epoch
        );
        if !current || request.epoch != self.epoch {
            debug!(
                stale_epoch = request.epoch,
                current_epoch = self.epoch,
                "discarding stale history"
            );
            return Ok(false);
        }

        self.state = SessionState::Active {
            counterpart: request.counterpart,
        };

        let messages = result?;
        let pending = std::mem::take(&mut self.feed);
        self.feed = messages.iter().map(|m| self.history_entry(m)).collect();
        for entry in pending {
            if !self.contains(entry.key) {
                self.feed.push(entry);
            }
        }
        Ok(true)
    }

    /// Select `counterpart`, fetch its history and apply it.
    pub async fn open_conversation(&mut self, counterpart: Counterpart) -> Result<(), StoreError> {
        let request = self.select_counterpart(counterpart);
        let result = self.fetch_history(&request).await;
        self.apply_history(request, result).map(|_| ())
    }

    /// Leave the current room and return to `Idle`.
    pub fn clear_selection(&mut self) {
        if let Some(room) = self.room.take() {
            self.leave(&room);
        }
        self.epoch += 1;
        self.feed.clear();
        self.state = SessionState::Idle;
    }

    // --- Messaging ---

    /// Send `text` to the active counterpart.
    ///
    /// Blank text or no selected counterpart is a no-op (`Ok(None)`). The
    /// message is persisted first; only a confirmed message is appended to
    /// the feed and published to the room. A store failure leaves the feed
    /// untouched and is returned for the user to retry.
    pub async fn send_message(&mut self, text: &str) -> Result<Option<FeedEntry>, ChatError> {
        let counterpart = match &self.state {
            SessionState::Idle => return Ok(None),
            _ if text.trim().is_empty() => return Ok(None),
            SessionState::Loading { .. } => return Err(ChatError::NotActive),
            SessionState::Active { counterpart } => counterpart.clone(),
        };

        let stored = self
            .store
            .create_message(&NewMessage {
                sender_id: self.me,
                receiver_id: counterpart.id,
                content: text.to_string(),
            })
            .await?;

        let entry = FeedEntry {
            key: FeedKey::Stored(stored.id),
            content: stored.content.clone(),
            sent_at: stored.sent_at,
            timestamp: local_display_timestamp(&stored.sent_at),
            is_sender: true,
        };
        if !self.contains(entry.key) {
            self.feed.push(entry.clone());
        }

        let event = RelayEvent::for_message(&stored);
        if let Err(err) = self.transport.publish(&event) {
            warn!(room = %event.room, error = %err, "publish failed, peer will see it on next open");
        }

        touch_conversation(
            &mut self.conversations,
            &counterpart,
            &stored.content,
            entry.timestamp.clone(),
        );
        Ok(Some(entry))
    }

    /// Apply a push event from the transport.
    ///
    /// Returns `true` if the event was appended to the feed. Own events,
    /// events for a counterpart other than the active one, and events whose
    /// message is already shown are ignored.
    pub fn on_receive(&mut self, event: RelayEvent) -> bool {
        if event.sender_id == self.me {
            return false;
        }
        let Some(counterpart) = self.state.counterpart().cloned() else {
            return false;
        };
        if event.sender_id != counterpart.id || event.receiver_id != self.me {
            debug!(sender = %event.sender_id, "push for inactive conversation dropped");
            return false;
        }

        let key = match event.message_id {
            Some(id) => FeedKey::Stored(id),
            None => {
                self.next_local_key += 1;
                FeedKey::Local(self.next_local_key)
            }
        };
        if self.contains(key) {
            return false;
        }

        let received_at = Utc::now();
        let timestamp = local_display_timestamp(&received_at);
        touch_conversation(
            &mut self.conversations,
            &counterpart,
            &event.content,
            timestamp.clone(),
        );
        self.feed.push(FeedEntry {
            key,
            content: event.content,
            sent_at: received_at,
            timestamp,
            is_sender: false,
        });
        true
    }

    // --- Conversation list ---

    /// Rebuild the conversation list from the store.
    pub async fn load_conversations(&mut self) -> Result<&[Conversation], StoreError> {
        let listed = self.store.list_messages_for_user(self.me).await?;
        self.conversations = fold_conversations(self.me, &listed, local_display_timestamp);
        Ok(&self.conversations)
    }

    fn history_entry(&self, message: &Message) -> FeedEntry {
        FeedEntry {
            key: FeedKey::Stored(message.id),
            content: message.content.clone(),
            sent_at: message.sent_at,
            timestamp: local_display_timestamp(&message.sent_at),
            is_sender: message.sender_id == self.me,
        }
    }

    fn contains(&self, key: FeedKey) -> bool {
        self.feed.iter().any(|e| e.key == key)
    }

    fn leave(&self, room: &RoomId) {
        if let Err(err) = self.transport.leave_room(room) {
            warn!(%room, error = %err, "room leave failed");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
