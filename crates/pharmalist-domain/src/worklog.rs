//! Work log entries - audit trail of actions taken on a list

use crate::ids::{ListId, WorkLogId};
use serde::{Deserialize, Serialize};

/// Immutable audit entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkLog {
    /// Unique identifier
    pub id: WorkLogId,

    /// List the action was taken on
    pub list_id: ListId,

    /// Version the action produced, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_number: Option<u32>,

    /// What was done
    pub action: String,

    /// Who did it
    pub performed_by: String,

    /// When (seconds since Unix epoch)
    pub timestamp: u64,
}

/// Input for a manual work log entry (`POST /worklogs`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWorkLog {
    /// List the action was taken on
    pub list_id: ListId,

    /// What was done
    pub action: String,

    /// Who did it
    #[serde(default)]
    pub performed_by: String,
}
