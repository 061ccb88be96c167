//! Application state wiring the message store and the room relay together.
//!
//! The message service is generic over its repository; AppState pins it to
//! the SQLite implementation.

use std::path::Path;
use std::sync::Arc;

use roomie_core::relay::RoomRelay;
use roomie_core::service::message::MessageService;
use roomie_infra::sqlite::message::SqliteMessageRepository;
use roomie_infra::sqlite::pool::{database_url, DatabasePool};
use roomie_types::config::RoomieConfig;

/// Concrete message service pinned to SQLite.
pub type ConcreteMessageService = MessageService<SqliteMessageRepository>;

/// Shared state for REST handlers and WebSocket connections.
#[derive(Clone)]
pub struct AppState {
    pub message_service: Arc<ConcreteMessageService>,
    pub relay: Arc<RoomRelay>,
    pub config: Arc<RoomieConfig>,
}

impl AppState {
    /// Open (or create) the database under `data_dir` and wire services.
    pub async fn init(data_dir: &Path, config: RoomieConfig) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(data_dir).await?;

        let db_pool = DatabasePool::new(&database_url(data_dir)).await?;
        let message_service = MessageService::new(SqliteMessageRepository::new(db_pool));
        let relay = RoomRelay::new(config.relay.mailbox_capacity);

        tracing::debug!(
            data_dir = %data_dir.display(),
            mailbox_capacity = config.relay.mailbox_capacity,
            "application state initialized"
        );

        Ok(Self {
            message_service: Arc::new(message_service),
            relay: Arc::new(relay),
            config: Arc::new(config),
        })
    }
}
