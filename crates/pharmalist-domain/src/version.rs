//! Version records - the append-only history of a list snapshot

use crate::ids::{ListId, VersionId};
use crate::list::{Item, ListRecord};
use serde::{Deserialize, Serialize};

/// Counts of snapshot changes introduced by one version
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangesSummary {
    /// Items appended
    #[serde(default)]
    pub added: usize,

    /// Items removed (always 0 for store-generated versions)
    #[serde(default)]
    pub removed: usize,

    /// Items updated (always 0 for store-generated versions)
    #[serde(default)]
    pub updated: usize,
}

impl ChangesSummary {
    /// Summary of a pure append
    pub fn added(count: usize) -> Self {
        Self {
            added: count,
            ..Default::default()
        }
    }
}

/// Immutable record of one change to a list snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListVersion {
    /// Unique identifier
    pub id: VersionId,

    /// Owning list
    pub list_id: ListId,

    /// Position in the history, starting at 1
    pub version_number: u32,

    /// Snapshot reference: the first `snapshot_len` items of the list
    /// form the snapshot at this version
    pub snapshot_len: usize,

    /// What changed
    pub changes_summary: ChangesSummary,

    /// Why it changed
    pub rationale: String,

    /// Acting user
    pub updated_by: String,

    /// Creation time (seconds since Unix epoch)
    pub created_at: u64,
}

/// Input for recording a version explicitly (`POST /versions`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVersion {
    /// Owning list
    pub list_id: ListId,

    /// Must be exactly one past the list's current version
    pub version_number: u32,

    /// What changed
    #[serde(default)]
    pub changes_summary: ChangesSummary,

    /// Why it changed
    #[serde(default)]
    pub rationale: String,

    /// Acting user
    #[serde(default)]
    pub updated_by: String,
}

/// Items visible at `version_number`, or `None` if the list has no such version
///
/// Snapshots only grow, so each version's snapshot is a prefix of the current one.
pub fn snapshot_at<'a>(
    list: &'a ListRecord,
    versions: &[ListVersion],
    version_number: u32,
) -> Option<&'a [Item]> {
    let version = versions
        .iter()
        .find(|v| v.list_id == list.id && v.version_number == version_number)?;
    list.current_snapshot.get(..version.snapshot_len)
}
