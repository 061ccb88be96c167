//! Conversation list derived from a flat message listing.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use roomie_types::chat::{Conversation, Counterpart};
use roomie_types::message::ParticipantMessage;
use roomie_types::participant::ParticipantId;

/// Fold `messages` into one conversation per distinct counterpart of `viewer`.
///
/// The first message seen for a counterpart wins: its content, timestamp and
/// read state become the summary, later ones are ignored. Supply messages
/// newest-first to get "most recent message" summaries. Entry order follows
/// first appearance.
pub fn fold_conversations<F>(
    viewer: ParticipantId,
    messages: &[ParticipantMessage],
    label: F,
) -> Vec<Conversation>
where
    F: Fn(&DateTime<Utc>) -> String,
{
    let mut seen = HashSet::new();
    let mut conversations = Vec::new();

    for listed in messages {
        let counterpart = listed.counterpart_of(viewer);
        if !seen.insert(counterpart.id) {
            continue;
        }
        let msg = &listed.message;
        conversations.push(Conversation {
            counterpart_id: counterpart.id,
            counterpart_name: counterpart.name.clone(),
            last_message: msg.content.clone(),
            timestamp: label(&msg.sent_at),
            unread: msg.sender_id != viewer && msg.read_at.is_none(),
        });
    }

    conversations
}

/// Record a new last message for `counterpart`.
///
/// Existing entries are updated in place; a counterpart with no entry yet is
/// added at the front.
pub fn touch_conversation(
    conversations: &mut Vec<Conversation>,
    counterpart: &Counterpart,
    content: &str,
    timestamp: String,
) {
    if let Some(entry) = conversations
        .iter_mut()
        .find(|c| c.counterpart_id == counterpart.id)
    {
        entry.last_message = content.to_string();
        entry.timestamp = timestamp;
        return;
    }

    conversations.insert(
        0,
        Conversation {
            counterpart_id: counterpart.id,
            counterpart_name: counterpart.name.clone(),
            last_message: content.to_string(),
            timestamp,
            unread: false,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomie_types::message::{Message, MessageId};
    use roomie_types::participant::Participant;

    const VIEWER: ParticipantId = ParticipantId(3);

    fn listed(id: i64, from: i64, to: i64, content: &str, read: bool) -> ParticipantMessage {
        let name = |p: i64| Participant {
            id: ParticipantId(p),
            name: format!("user-{p}"),
        };
        ParticipantMessage {
            message: Message {
                id: MessageId(id),
                sender_id: ParticipantId(from),
                receiver_id: ParticipantId(to),
                content: content.to_string(),
                sent_at: Utc::now(),
                read_at: read.then(Utc::now),
            },
            sender: name(from),
            receiver: name(to),
        }
    }

    fn fixed_label(_: &DateTime<Utc>) -> String {
        "label".to_string()
    }

    #[test]
    fn first_seen_wins_per_counterpart() {
        let messages = vec![
            listed(1, 7, 3, "a", true),
            listed(2, 3, 7, "b", false),
            listed(3, 3, 9, "c", false),
        ];

        let conversations = fold_conversations(VIEWER, &messages, fixed_label);

        assert_eq!(conversations.len(), 2);
        assert_eq!(conversations[0].counterpart_id, ParticipantId(7));
        assert_eq!(conversations[0].last_message, "a");
        assert_eq!(conversations[0].counterpart_name, "user-7");
        assert_eq!(conversations[1].counterpart_id, ParticipantId(9));
        assert_eq!(conversations[1].last_message, "c");
    }

    #[test]
    fn unread_only_for_unread_incoming() {
        let messages = vec![
            listed(1, 7, 3, "incoming unread", false),
            listed(2, 8, 3, "incoming read", true),
            listed(3, 3, 9, "outgoing", false),
        ];

        let conversations = fold_conversations(VIEWER, &messages, fixed_label);

        assert!(conversations[0].unread);
        assert!(!conversations[1].unread);
        assert!(!conversations[2].unread);
    }

    #[test]
    fn empty_listing_gives_empty_list() {
        assert!(fold_conversations(VIEWER, &[], fixed_label).is_empty());
    }

    #[test]
    fn touch_updates_existing_entry_in_place() {
        let mut conversations = fold_conversations(
            VIEWER,
            &[listed(1, 7, 3, "a", true), listed(2, 9, 3, "b", true)],
            fixed_label,
        );
        let counterpart = Counterpart { id: ParticipantId(9), name: "user-9".to_string() };

        touch_conversation(&mut conversations, &counterpart, "newer", "now".to_string());

        assert_eq!(conversations.len(), 2);
        assert_eq!(conversations[1].last_message, "newer");
        assert_eq!(conversations[1].timestamp, "now");
    }

    #[test]
    fn touch_adds_missing_counterpart_at_front() {
        let mut conversations =
            fold_conversations(VIEWER, &[listed(1, 7, 3, "a", true)], fixed_label);
        let counterpart = Counterpart { id: ParticipantId(12), name: "Dana".to_string() };

        touch_conversation(&mut conversations, &counterpart, "first words", "now".to_string());

        assert_eq!(conversations.len(), 2);
        assert_eq!(conversations[0].counterpart_name, "Dana");
        assert!(!conversations[0].unread);
    }
}
