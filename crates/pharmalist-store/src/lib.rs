//! Pharmalist Storage Layer
//!
//! Implements the `ListStore` trait three ways:
//!
//! - [`MemoryStore`]: in-process state, used as a test double
//! - [`MemoryStore::open_blob`]: the same state persisted as one JSON blob under
//!   the fixed [`STORAGE_KEY`] (the local fallback when no server is reachable)
//! - [`SqliteStore`]: relational storage for the server
//!
//! # Examples
//!
//! ```
//! use pharmalist_domain::{ListStore, NewList};
//! use pharmalist_store::MemoryStore;
//!
//! let mut store = MemoryStore::new();
//! let list = store.create(NewList::new("Customer", "Q4 List")).unwrap();
//! assert_eq!(list.version_number, 1);
//! ```

#![warn(missing_docs)]

mod catalog;
mod memory;
mod plan;
mod sqlite;

pub use catalog::Catalog;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use pharmalist_domain::ValidationError;
use thiserror::Error;

/// Fixed key of the serialized fallback blob
pub const STORAGE_KEY: &str = "pharma_lists_store";

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// List not found
    #[error("List not found: {0}")]
    NotFound(String),

    /// Input rejected
    #[error("Validation error: {0}")]
    Validation(String),

    /// Stored data could not be decoded
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Blob (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Blob file error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ValidationError> for StoreError {
    fn from(e: ValidationError) -> Self {
        StoreError::Validation(e.0)
    }
}

impl StoreError {
    /// Whether the error reports an unknown list
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }

    /// Whether the error reports rejected input
    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::Validation(_))
    }
}
