//! Response shapes shared by the HTTP server and its clients

use crate::ids::ListId;
use crate::list::{Item, ListRecord};
use crate::registry::DomainKey;
use crate::version::ListVersion;
use serde::{Deserialize, Serialize};

/// List metadata without its items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSummary {
    /// Unique identifier
    pub id: ListId,

    /// Business domain
    pub category: DomainKey,

    /// Subdomain list type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_type: Option<String>,

    /// Title / purpose
    pub purpose: String,

    /// Who requested the list
    pub requester_name: String,

    /// Role of the requester
    pub requester_role: String,

    /// Latest version number
    pub version_number: u32,

    /// Items in the current snapshot
    pub item_count: usize,

    /// Creation time (seconds since Unix epoch)
    pub created_at: u64,

    /// Last modification time (seconds since Unix epoch)
    pub updated_at: u64,
}

impl From<&ListRecord> for ListSummary {
    fn from(record: &ListRecord) -> Self {
        Self {
            id: record.id,
            category: record.category,
            list_type: record.list_type.clone(),
            purpose: record.purpose.clone(),
            requester_name: record.requester_name.clone(),
            requester_role: record.requester_role.clone(),
            version_number: record.version_number,
            item_count: record.item_count(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// A list with its items and full version history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListDetail {
    /// Metadata
    #[serde(flatten)]
    pub summary: ListSummary,

    /// Current items, in insertion order
    pub current_snapshot: Vec<Item>,

    /// Versions, oldest first
    pub versions: Vec<ListVersion>,
}

impl ListDetail {
    /// Combine a record with its versions
    pub fn new(record: ListRecord, versions: Vec<ListVersion>) -> Self {
        Self {
            summary: ListSummary::from(&record),
            current_snapshot: record.current_snapshot,
            versions,
        }
    }

    /// Items visible at `version_number`, if the list has that version
    pub fn snapshot_at(&self, version_number: u32) -> Option<&[Item]> {
        let version = self
            .versions
            .iter()
            .find(|v| v.version_number == version_number)?;
        self.current_snapshot.get(..version.snapshot_len)
    }
}

/// Body of a delete response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// Whether a list was removed
    pub success: bool,
}
