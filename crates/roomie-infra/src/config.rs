//! Configuration loader for Roomie.
//!
//! Reads `config.toml` from the data directory (`~/.roomie/` in production)
//! and deserializes it into [`RoomieConfig`]. Falls back to defaults when the
//! file is missing or malformed.

use std::path::{Path, PathBuf};

use roomie_types::config::RoomieConfig;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "ROOMIE_DATA_DIR";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `ROOMIE_DATA_DIR` environment variable
/// 2. `~/.roomie`
/// 3. `./.roomie`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".roomie");
    }

    PathBuf::from(".roomie")
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`RoomieConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - Otherwise returns the parsed config; absent keys keep their defaults.
pub async fn load_config(data_dir: &Path) -> RoomieConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return RoomieConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return RoomieConfig::default();
        }
    };

    match toml::from_str::<RoomieConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            RoomieConfig::default()
        }
    }
}
