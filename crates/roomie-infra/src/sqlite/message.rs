//! SQLite message repository implementation.
//!
//! Implements `MessageRepository` from `roomie-core` using sqlx with split
//! read/write pools. Persists participants and the direct messages exchanged
//! between them.

use chrono::{DateTime, Utc};
use roomie_core::repository::message::MessageRepository;
use roomie_types::error::RepositoryError;
use roomie_types::message::{Message, MessageId, NewMessage, ParticipantMessage};
use roomie_types::participant::{Participant, ParticipantId};
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `MessageRepository`.
pub struct SqliteMessageRepository {
    pool: DatabasePool,
}

impl SqliteMessageRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    async fn fetch_message(&self, id: MessageId) -> Result<Option<Message>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM messages WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.as_ref()
            .map(|r| {
                MessageRow::from_row(r)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?
                    .into_message()
            })
            .transpose()
    }
}

// ---------------------------------------------------------------------------
// Internal row types
// ---------------------------------------------------------------------------

struct MessageRow {
    id: i64,
    sender_id: i64,
    receiver_id: i64,
    content: String,
    sent_at: String,
    read_at: Option<String>,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            sender_id: row.try_get("sender_id")?,
            receiver_id: row.try_get("receiver_id")?,
            content: row.try_get("content")?,
            sent_at: row.try_get("sent_at")?,
            read_at: row.try_get("read_at")?,
        })
    }

    fn into_message(self) -> Result<Message, RepositoryError> {
        Ok(Message {
            id: MessageId(self.id),
            sender_id: ParticipantId(self.sender_id),
            receiver_id: ParticipantId(self.receiver_id),
            content: self.content,
            sent_at: parse_datetime(&self.sent_at)?,
            read_at: self.read_at.as_deref().map(parse_datetime).transpose()?,
        })
    }
}

/// A message row joined with both participants' names.
struct ListedRow {
    message: MessageRow,
    sender_name: String,
    receiver_name: String,
}

impl ListedRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            message: MessageRow::from_row(row)?,
            sender_name: row.try_get("sender_name")?,
            receiver_name: row.try_get("receiver_name")?,
        })
    }

    fn into_listed(self) -> Result<ParticipantMessage, RepositoryError> {
        let message = self.message.into_message()?;
        Ok(ParticipantMessage {
            sender: Participant {
                id: message.sender_id,
                name: self.sender_name,
            },
            receiver: Participant {
                id: message.receiver_id,
                name: self.receiver_name,
            },
            message,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

// ---------------------------------------------------------------------------
// MessageRepository impl
// ---------------------------------------------------------------------------

impl MessageRepository for SqliteMessageRepository {
    async fn create_participant(&self, name: &str) -> Result<Participant, RepositoryError> {
        let result = sqlx::query("INSERT INTO participants (name, created_at) VALUES (?, ?)")
            .bind(name)
            .bind(format_datetime(&Utc::now()))
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(Participant {
            id: ParticipantId(result.last_insert_rowid()),
            name: name.to_string(),
        })
    }

    async fn get_participant(
        &self,
        id: ParticipantId,
    ) -> Result<Option<Participant>, RepositoryError> {
        let row = sqlx::query("SELECT id, name FROM participants WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let id: i64 = row
            .try_get("id")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        let name: String = row
            .try_get("name")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(Some(Participant {
            id: ParticipantId(id),
            name,
        }))
    }

    async fn insert_message(&self, msg: &NewMessage) -> Result<Message, RepositoryError> {
        let sent_at = Utc::now();

        let result = sqlx::query(
            r#"INSERT INTO messages (sender_id, receiver_id, content, sent_at)
               VALUES (?, ?, ?, ?)"#,
        )
        .bind(msg.sender_id.0)
        .bind(msg.receiver_id.0)
        .bind(&msg.content)
        .bind(format_datetime(&sent_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(Message {
            id: MessageId(result.last_insert_rowid()),
            sender_id: msg.sender_id,
            receiver_id: msg.receiver_id,
            content: msg.content.clone(),
            sent_at,
            read_at: None,
        })
    }

    async fn messages_between(
        &self,
        a: ParticipantId,
        b: ParticipantId,
    ) -> Result<Vec<Message>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT * FROM messages
               WHERE (sender_id = ? AND receiver_id = ?)
                  OR (sender_id = ? AND receiver_id = ?)
               ORDER BY id ASC"#,
        )
        .bind(a.0)
        .bind(b.0)
        .bind(b.0)
        .bind(a.0)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut msgs = Vec::with_capacity(rows.len());
        for row in &rows {
            let r = MessageRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            msgs.push(r.into_message()?);
        }
        Ok(msgs)
    }

    async fn messages_for_user(
        &self,
        user: ParticipantId,
    ) -> Result<Vec<ParticipantMessage>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT m.*, s.name AS sender_name, r.name AS receiver_name
               FROM messages m
               JOIN participants s ON s.id = m.sender_id
               JOIN participants r ON r.id = m.receiver_id
               WHERE m.sender_id = ? OR m.receiver_id = ?
               ORDER BY m.id DESC"#,
        )
        .bind(user.0)
        .bind(user.0)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut listed = Vec::with_capacity(rows.len());
        for row in &rows {
            let r = ListedRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            listed.push(r.into_listed()?);
        }
        Ok(listed)
    }

    async fn mark_read(
        &self,
        id: MessageId,
        reader: ParticipantId,
    ) -> Result<Option<Message>, RepositoryError> {
        sqlx::query(
            r#"UPDATE messages SET read_at = ?
               WHERE id = ? AND receiver_id = ? AND read_at IS NULL"#,
        )
        .bind(format_datetime(&Utc::now()))
        .bind(id.0)
        .bind(reader.0)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        self.fetch_message(id).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
