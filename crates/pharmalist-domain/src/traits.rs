//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::{
    AddItemsOutcome, DomainKey, ItemBatch, ListId, ListRecord, ListUpdate, ListVersion, NewList,
    NewVersion, NewWorkLog, WorkLog,
};

/// Trait for storing lists together with their versions and work logs
///
/// Implemented by the infrastructure layer (pharmalist-store). Implementations
/// must keep `version_number == versions(id).len()` for every list, keep item ids
/// unique within a list and preserve snapshot insertion order.
pub trait ListStore {
    /// Error type for store operations
    type Error;

    /// Create a list; its initial items form version 1
    fn create(&mut self, new_list: NewList) -> Result<ListRecord, Self::Error>;

    /// Get a list by ID (not-found is an error)
    fn get(&self, id: ListId) -> Result<ListRecord, Self::Error>;

    /// All lists in creation order, optionally restricted to one domain
    fn list(&self, domain: Option<DomainKey>) -> Result<Vec<ListRecord>, Self::Error>;

    /// Update list metadata; does not create a version
    fn update(&mut self, id: ListId, update: ListUpdate) -> Result<ListRecord, Self::Error>;

    /// Append items as a new version
    fn add_items(&mut self, id: ListId, batch: ItemBatch) -> Result<AddItemsOutcome, Self::Error>;

    /// Remove a list with its versions and work logs
    ///
    /// Returns whether anything was removed; removing an unknown id is not an error.
    fn delete(&mut self, id: ListId) -> Result<bool, Self::Error>;

    /// Discard all state and reseed the fixed sample dataset
    fn reset_to_default(&mut self) -> Result<Vec<ListRecord>, Self::Error>;

    /// Version history of a list, oldest first
    fn versions(&self, id: ListId) -> Result<Vec<ListVersion>, Self::Error>;

    /// Record a version explicitly without touching the snapshot
    fn record_version(&mut self, version: NewVersion) -> Result<ListVersion, Self::Error>;

    /// Work logs of a list, oldest first
    fn work_logs(&self, id: ListId) -> Result<Vec<WorkLog>, Self::Error>;

    /// Append a manual work log entry
    fn add_work_log(&mut self, entry: NewWorkLog) -> Result<WorkLog, Self::Error>;
}
