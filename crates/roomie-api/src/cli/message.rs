//! CLI messaging subcommands: send, history, conversations and read receipts.
//!
//! All of them go through the REST message store, so a server started with
//! `roomie serve` must be reachable.

use anyhow::{Context, Result};
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;

use roomie_core::chat::conversation::fold_conversations;
use roomie_core::chat::display::local_display_timestamp;
use roomie_core::store::MessageStore;
use roomie_infra::rest::HttpMessageStore;
use roomie_types::message::{MessageId, NewMessage};
use roomie_types::participant::ParticipantId;

/// Maximum characters of message content shown in tables.
const PREVIEW_CHARS: usize = 60;

// ---------------------------------------------------------------------------
// Send
// ---------------------------------------------------------------------------

pub async fn handle_send(
    client: &HttpMessageStore,
    from: ParticipantId,
    to: ParticipantId,
    content: String,
    json: bool,
) -> Result<()> {
    let stored = client
        .create_message(&NewMessage {
            sender_id: from,
            receiver_id: to,
            content,
        })
        .await
        .context("Failed to send message")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stored)?);
    } else {
        println!();
        println!(
            "  {} Sent message {} from {} to {}",
            style("*").green().bold(),
            style(stored.id).yellow(),
            style(from).cyan(),
            style(to).cyan(),
        );
        println!();
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

pub async fn handle_history(
    client: &HttpMessageStore,
    viewer: ParticipantId,
    counterpart: ParticipantId,
    json: bool,
) -> Result<()> {
    let messages = client
        .list_messages_between(viewer, counterpart)
        .await
        .context("Failed to get message history")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&messages)?);
        return Ok(());
    }

    if messages.is_empty() {
        println!();
        println!("  No messages between {viewer} and {counterpart}.");
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Time").fg(Color::Cyan),
            Cell::new("From"),
            Cell::new("Message"),
        ]);

    for m in &messages {
        let from = if m.sender_id == viewer {
            Cell::new("you").fg(Color::Green)
        } else {
            Cell::new(m.sender_id)
        };
        table.add_row(vec![
            Cell::new(local_display_timestamp(&m.sent_at)),
            from,
            Cell::new(preview(&m.content, PREVIEW_CHARS)),
        ]);
    }

    println!();
    println!(
        "  Conversation between {} and {}",
        style(viewer).cyan(),
        style(counterpart).cyan()
    );
    println!();
    println!("{table}");
    println!();
    Ok(())
}

// ---------------------------------------------------------------------------
// Conversations
// ---------------------------------------------------------------------------

pub async fn handle_conversations(
    client: &HttpMessageStore,
    user: ParticipantId,
    json: bool,
) -> Result<()> {
    let listed = client
        .list_messages_for_user(user)
        .await
        .context("Failed to list conversations")?;
    let conversations = fold_conversations(user, &listed, local_display_timestamp);

    if json {
        println!("{}", serde_json::to_string_pretty(&conversations)?);
        return Ok(());
    }

    if conversations.is_empty() {
        println!();
        println!("  No conversations yet.");
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("With").fg(Color::Cyan),
            Cell::new("Last message"),
            Cell::new("When"),
            Cell::new(""),
        ]);

    for c in &conversations {
        let marker = if c.unread {
            Cell::new("new").fg(Color::Yellow)
        } else {
            Cell::new("")
        };
        table.add_row(vec![
            Cell::new(format!("{} ({})", c.counterpart_name, c.counterpart_id)),
            Cell::new(preview(&c.last_message, PREVIEW_CHARS)),
            Cell::new(&c.timestamp),
            marker,
        ]);
    }

    println!();
    println!("{table}");
    println!();
    Ok(())
}

// ---------------------------------------------------------------------------
// Read receipts
// ---------------------------------------------------------------------------

pub async fn handle_read(
    client: &HttpMessageStore,
    id: MessageId,
    reader: ParticipantId,
    json: bool,
) -> Result<()> {
    let message = client
        .mark_read(id, reader)
        .await
        .with_context(|| format!("Failed to mark message {id} read"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&message)?);
    } else if message.read_at.is_some() {
        println!("  {} Message {id} marked read", style("*").green().bold());
    } else {
        println!(
            "  {}",
            style(format!("Message {id} is not addressed to {reader}; left unread")).dim()
        );
    }
    Ok(())
}

/// First `max` characters of `text` on one line, with an ellipsis if cut.
fn preview(text: &str, max: usize) -> String {
    let single_line = text.replace('\n', " ");
    if single_line.chars().count() <= max {
        return single_line;
    }
    let cut: String = single_line.chars().take(max.saturating_sub(3)).collect();
    format!("{cut}...")
}
