//! Pharmalist Domain Layer
//!
//! This crate contains the core domain model for Pharmalist: contact lists
//! organized by business domain, their append-only version history and the
//! audit trail of actions taken on them. It defines the fundamental types and
//! the trait interface that the storage, server and client layers depend upon.
//!
//! ## Key Concepts
//!
//! - **List**: a named, domain-scoped collection of contact items
//! - **Snapshot**: the current items of a list, in insertion order
//! - **Version**: immutable record of one change to a snapshot
//! - **Work Log**: audit entry describing an action taken on a list
//! - **Registry**: domains, their list types and legacy category names
//!
//! ## Architecture
//!
//! - Minimal dependencies (ids and serialization only)
//! - Pure model and validation logic
//! - Storage implementations live in other crates behind [`traits::ListStore`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod ids;
pub mod list;
pub mod registry;
pub mod seed;
pub mod traits;
pub mod version;
pub mod worklog;

// Re-exports for convenience
pub use api::{DeleteResponse, ListDetail, ListSummary};
pub use ids::{ItemId, ListId, VersionId, WorkLogId};
pub use list::{
    unix_now, AddItemsOutcome, Attributes, Item, ItemBatch, ListRecord, ListUpdate, NewList,
    ValidationError, DEFAULT_ACTOR, DEFAULT_RATIONALE,
};
pub use registry::{DomainConfig, DomainKey};
pub use traits::ListStore;
pub use version::{snapshot_at, ChangesSummary, ListVersion, NewVersion};
pub use worklog::{NewWorkLog, WorkLog};
