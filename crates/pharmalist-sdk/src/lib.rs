//! Pharmalist Rust SDK
//!
//! Async access to contact lists, either over HTTP against a running
//! `pharmalist-server` or directly against a local
//! [`ListStore`](pharmalist_domain::ListStore).
//!
//! # Example
//!
//! ```no_run
//! use pharmalist_domain::{DomainKey, NewList};
//! use pharmalist_sdk::{ListService, PharmaClient};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), pharmalist_sdk::SdkError> {
//! let client = PharmaClient::new("http://localhost:8000")?;
//!
//! let created = client
//!     .create(NewList::new("Customer", "Q4 List").with_requester("Anita", "Brand Manager"))
//!     .await?;
//! let customer_lists = client.list(Some(DomainKey::Customer)).await?;
//! assert!(customer_lists.iter().any(|l| l.id == created.id));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod client;
mod error;
mod local;
mod poller;

pub use client::{HealthStatus, PharmaClient, DEFAULT_TIMEOUT_SECS};
pub use error::SdkError;
pub use local::LocalService;
pub use poller::{ListPoller, PollHandle, DEFAULT_POLL_INTERVAL, MIN_POLL_INTERVAL};

use async_trait::async_trait;
use pharmalist_domain::{
    AddItemsOutcome, DomainKey, ItemBatch, ListDetail, ListId, ListSummary, ListUpdate,
    ListVersion, NewList, NewVersion, NewWorkLog, WorkLog,
};
use pharmalist_llm::{QueryAnswer, QueryRequest};

/// Operations on contact lists, independent of where they are stored
///
/// Mirrors [`ListStore`](pharmalist_domain::ListStore) with the wire shapes
/// of the HTTP API. Errors leave the caller's prior state untouched; nothing
/// is retried.
#[async_trait]
pub trait ListService: Send + Sync {
    /// Lists in creation order, optionally restricted to one domain
    async fn list(&self, domain: Option<DomainKey>) -> Result<Vec<ListSummary>, SdkError>;

    /// A list with its current snapshot and version history
    async fn get(&self, id: ListId) -> Result<ListDetail, SdkError>;

    /// Create a list
    async fn create(&self, new_list: NewList) -> Result<ListSummary, SdkError>;

    /// Change list metadata
    async fn update(&self, id: ListId, update: ListUpdate) -> Result<ListSummary, SdkError>;

    /// Append items as a new version
    async fn add_items(&self, id: ListId, batch: ItemBatch) -> Result<AddItemsOutcome, SdkError>;

    /// Delete a list; `false` when it did not exist
    async fn delete(&self, id: ListId) -> Result<bool, SdkError>;

    /// Version history, oldest first
    async fn versions(&self, id: ListId) -> Result<Vec<ListVersion>, SdkError>;

    /// Record a version explicitly
    async fn record_version(&self, version: NewVersion) -> Result<ListVersion, SdkError>;

    /// Work logs, oldest first
    async fn work_logs(&self, id: ListId) -> Result<Vec<WorkLog>, SdkError>;

    /// Append a work log entry
    async fn add_work_log(&self, entry: NewWorkLog) -> Result<WorkLog, SdkError>;

    /// Restore the sample dataset
    async fn reset(&self) -> Result<Vec<ListSummary>, SdkError>;

    /// Ask a question about the lists
    ///
    /// An unreachable answer provider yields the fallback answer, not an error.
    async fn ask(&self, request: QueryRequest) -> Result<QueryAnswer, SdkError>;
}
