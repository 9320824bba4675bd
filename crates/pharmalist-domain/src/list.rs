//! List module - a named, domain-scoped collection of contact items

use crate::ids::{ItemId, ListId};
use crate::registry::DomainKey;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Free-form item attributes (name, specialty, institution, tier, email, ...)
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// Rationale recorded when a bulk add does not supply one
pub const DEFAULT_RATIONALE: &str = "Bulk upload";

/// Acting user recorded when a request does not name one
pub const DEFAULT_ACTOR: &str = "Current User";

/// One entry of a list snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Generated identifier, unique within the owning list
    pub id: ItemId,

    /// Entity attributes as supplied by the caller
    pub attributes: Attributes,
}

impl Item {
    /// Wrap attributes into an item with a fresh identifier
    pub fn new(attributes: Attributes) -> Self {
        Self {
            id: ItemId::new(),
            attributes,
        }
    }

    /// Get an attribute as text, if present
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(|v| v.as_str())
    }
}

/// A list record with its current snapshot
///
/// The snapshot only grows: items are appended, never edited or removed.
/// `version_number` always equals the number of versions recorded for the list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListRecord {
    /// Unique identifier
    pub id: ListId,

    /// Business domain
    pub category: DomainKey,

    /// Subdomain list type (e.g. "Target Lists")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_type: Option<String>,

    /// Title / purpose of the list
    pub purpose: String,

    /// Who requested the list
    pub requester_name: String,

    /// Role of the requester
    pub requester_role: String,

    /// Latest version number (starts at 1)
    pub version_number: u32,

    /// Creation time (seconds since Unix epoch)
    pub created_at: u64,

    /// Last modification time (seconds since Unix epoch)
    pub updated_at: u64,

    /// Current items, in insertion order
    pub current_snapshot: Vec<Item>,
}

impl ListRecord {
    /// Number of items in the current snapshot
    pub fn item_count(&self) -> usize {
        self.current_snapshot.len()
    }
}

/// Input for creating a list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewList {
    /// Domain key or legacy category name
    pub category: String,

    /// Title / purpose
    pub purpose: String,

    /// Requester name
    #[serde(default)]
    pub requester_name: String,

    /// Requester role
    #[serde(default)]
    pub requester_role: String,

    /// Optional list type, must belong to the domain
    #[serde(default)]
    pub list_type: Option<String>,

    /// Initial items
    #[serde(default)]
    pub items: Vec<Attributes>,

    /// Acting user for the first version (defaults to the requester)
    #[serde(default)]
    pub created_by: Option<String>,
}

impl NewList {
    /// Create input with the mandatory fields
    pub fn new(category: impl Into<String>, purpose: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            purpose: purpose.into(),
            ..Default::default()
        }
    }

    /// Set the initial items
    pub fn with_items(mut self, items: Vec<Attributes>) -> Self {
        self.items = items;
        self
    }

    /// Set requester name and role
    pub fn with_requester(mut self, name: impl Into<String>, role: impl Into<String>) -> Self {
        self.requester_name = name.into();
        self.requester_role = role.into();
        self
    }

    /// Set the list type
    pub fn with_list_type(mut self, list_type: impl Into<String>) -> Self {
        self.list_type = Some(list_type.into());
        self
    }

    /// Validate the input and resolve its domain key
    ///
    /// # Errors
    /// Returns error if the category is unknown, the purpose is blank or the
    /// list type does not belong to the domain
    pub fn validate(&self) -> Result<DomainKey, ValidationError> {
        validate_purpose(&self.purpose)?;
        let key = resolve_category(&self.category)?;
        if let Some(list_type) = &self.list_type {
            validate_list_type(key, list_type)?;
        }
        Ok(key)
    }

    /// Acting user for the first version
    pub fn actor(&self) -> String {
        self.created_by
            .clone()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| Some(self.requester_name.clone()).filter(|s| !s.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_ACTOR.to_string())
    }
}

/// Partial update of list metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListUpdate {
    /// New requester name
    #[serde(default)]
    pub requester_name: Option<String>,

    /// New requester role
    #[serde(default)]
    pub requester_role: Option<String>,

    /// New purpose
    #[serde(default)]
    pub purpose: Option<String>,

    /// New category (key or legacy name)
    #[serde(default)]
    pub category: Option<String>,

    /// New list type
    #[serde(default)]
    pub list_type: Option<String>,
}

impl ListUpdate {
    /// Apply the update to a record, validating every supplied field first
    ///
    /// Nothing is modified when validation fails.
    pub fn apply(&self, record: &mut ListRecord, now: u64) -> Result<(), ValidationError> {
        if let Some(purpose) = &self.purpose {
            validate_purpose(purpose)?;
        }
        let category = match &self.category {
            Some(category) => resolve_category(category)?,
            None => record.category,
        };
        let list_type = self.list_type.clone().or_else(|| record.list_type.clone());
        if let Some(list_type) = &list_type {
            validate_list_type(category, list_type)?;
        }

        if let Some(name) = &self.requester_name {
            record.requester_name = name.clone();
        }
        if let Some(role) = &self.requester_role {
            record.requester_role = role.clone();
        }
        if let Some(purpose) = &self.purpose {
            record.purpose = purpose.trim().to_string();
        }
        record.category = category;
        record.list_type = list_type;
        record.updated_at = now;
        Ok(())
    }
}

/// A batch of items appended in one step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemBatch {
    /// Items to append
    pub items: Vec<Attributes>,

    /// Acting user
    #[serde(default)]
    pub updated_by: Option<String>,

    /// Why the items were added
    #[serde(default)]
    pub rationale: Option<String>,
}

impl ItemBatch {
    /// Batch with default actor and rationale
    pub fn new(items: Vec<Attributes>) -> Self {
        Self {
            items,
            ..Default::default()
        }
    }

    /// Set the acting user
    pub fn by(mut self, user: impl Into<String>) -> Self {
        self.updated_by = Some(user.into());
        self
    }

    /// Acting user, or the default
    pub fn actor(&self) -> String {
        self.updated_by
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ACTOR.to_string())
    }

    /// Rationale, or "Bulk upload"
    pub fn rationale(&self) -> String {
        self.rationale
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_RATIONALE.to_string())
    }
}

/// Result of appending a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddItemsOutcome {
    /// Number of items appended
    pub added: usize,

    /// Version number created by the append
    pub version_number: u32,
}

/// Input rejected by validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ValidationError {}

fn validate_purpose(purpose: &str) -> Result<(), ValidationError> {
    if purpose.trim().is_empty() {
        return Err(ValidationError("List title cannot be empty".to_string()));
    }
    Ok(())
}

fn resolve_category(category: &str) -> Result<DomainKey, ValidationError> {
    DomainKey::resolve(category)
        .ok_or_else(|| ValidationError(format!("Unknown domain: '{}'", category)))
}

fn validate_list_type(key: DomainKey, list_type: &str) -> Result<(), ValidationError> {
    if !key.allows_list_type(list_type) {
        return Err(ValidationError(format!(
            "List type '{}' does not belong to domain {}",
            list_type, key
        )));
    }
    Ok(())
}

/// Current time in seconds since the Unix epoch
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
