//! Pharmalist Server
//!
//! HTTP JSON API over a [`ListStore`](pharmalist_domain::ListStore): list
//! CRUD, bulk item appends, version history, work logs, the domain registry
//! and the conversational query relay.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;

use config::{ServerConfig, StorageBackend};
use handlers::{create_router, AppState};
use pharmalist_llm::{EchoProvider, LlmError, OllamaProvider, QueryRelay};
use pharmalist_store::{MemoryStore, SqliteStore, StoreError};
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Store could not be opened
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Answer provider could not be built
    #[error("Answer provider error: {0}")]
    Llm(#[from] LlmError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Open the configured store and answer provider
///
/// # Errors
/// Returns error if the store cannot be opened or the provider cannot be built
pub fn build_state(config: &ServerConfig) -> Result<AppState, ServerError> {
    let relay = match &config.llm {
        Some(llm) => {
            info!(endpoint = %llm.endpoint, model = %llm.model, "using ollama answer provider");
            QueryRelay::new(OllamaProvider::with_timeout(
                &llm.endpoint,
                &llm.model,
                Duration::from_secs(llm.timeout_secs),
            )?)
        }
        None => {
            info!("no answer provider configured, /query will echo");
            QueryRelay::new(EchoProvider)
        }
    };

    let storage = &config.storage;
    let missing_path = || config::ConfigError::MissingField("storage.path".to_string());
    let state = match storage.backend {
        StorageBackend::Memory if storage.seed_on_start => AppState::new(MemoryStore::seeded(), relay),
        StorageBackend::Memory => AppState::new(MemoryStore::new(), relay),
        StorageBackend::Blob => {
            let dir = storage.path.as_ref().ok_or_else(missing_path)?;
            AppState::new(MemoryStore::open_blob(dir)?, relay)
        }
        StorageBackend::Sqlite => {
            let path = storage.path.as_ref().ok_or_else(missing_path)?;
            let store = if storage.seed_on_start {
                SqliteStore::open_seeded(path)?
            } else {
                SqliteStore::new(path)?
            };
            AppState::new(store, relay)
        }
    };
    info!(backend = ?storage.backend, "store opened");
    Ok(state)
}

/// Start the HTTP server
///
/// Installs the tracing subscriber (`RUST_LOG`, default `info`), opens the
/// store and serves until the process is stopped.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A subscriber may already be installed by an embedding process
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    info!("Starting Pharmalist server");
    let state = build_state(&config)?;
    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::StorageConfig;
    use pharmalist_domain::ListStore;

    #[test]
    fn test_build_state_for_each_backend() {
        let dir = tempfile::TempDir::new().unwrap();
        for (backend, path) in [
            (StorageBackend::Memory, None),
            (StorageBackend::Blob, Some(dir.path().join("blob"))),
            (StorageBackend::Sqlite, Some(dir.path().join("lists.db"))),
        ] {
            let mut config = ServerConfig::default_test_config();
            config.storage = StorageConfig {
                backend,
                path,
                seed_on_start: true,
            };
            let state = build_state(&config).unwrap();
            let count = state.store.lock().unwrap().list(None).unwrap().len();
            assert_eq!(count, 3, "{backend:?}");
        }
    }

    #[test]
    fn test_file_backend_without_path_fails() {
        let mut config = ServerConfig::default_test_config();
        config.storage.backend = StorageBackend::Sqlite;
        assert!(matches!(build_state(&config), Err(ServerError::Config(_))));
    }
}
