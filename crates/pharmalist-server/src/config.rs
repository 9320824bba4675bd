//! Configuration file parsing for the server.
//!
//! Loads the bind address, storage backend and optional answer provider from
//! a TOML file.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),
}

/// Where lists are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process memory; lost on restart
    Memory,
    /// Single JSON blob in a directory
    Blob,
    /// SQLite database file
    Sqlite,
}

/// Storage section
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Backend kind
    pub backend: StorageBackend,

    /// Blob directory or database file; required for `blob` and `sqlite`
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Load the sample dataset when the store starts empty
    #[serde(default = "default_seed")]
    pub seed_on_start: bool,
}

/// Answer provider section
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// Ollama endpoint (e.g., "http://localhost:11434")
    pub endpoint: String,

    /// Model name (e.g., "llama3")
    pub model: String,

    /// Request timeout in seconds
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    pub bind_address: String,

    /// Bind port (e.g., 8000)
    pub bind_port: u16,

    /// Storage settings
    pub storage: StorageConfig,

    /// Answer provider; without it `/query` echoes the question
    #[serde(default)]
    pub llm: Option<LlmConfig>,
}

fn default_seed() -> bool {
    true
}

fn default_llm_timeout() -> u64 {
    15
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: ServerConfig = toml::from_str(&contents)?;

        if config.storage.backend != StorageBackend::Memory && config.storage.path.is_none() {
            return Err(ConfigError::MissingField("storage.path".to_string()));
        }

        Ok(config)
    }

    /// Create a default configuration for testing
    pub fn default_test_config() -> Self {
        ServerConfig {
            bind_address: "127.0.0.1".to_string(),
            bind_port: 8000,
            storage: StorageConfig {
                backend: StorageBackend::Memory,
                path: None,
                seed_on_start: true,
            },
            llm: None,
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}
