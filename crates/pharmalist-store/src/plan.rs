//! Pure mutation planning shared by every backend
//!
//! Each function validates its input against the current record and returns
//! the rows a backend has to write. Backends apply a plan as a whole or not at all.

use crate::StoreError;
use pharmalist_domain::{
    AddItemsOutcome, ChangesSummary, Item, ItemBatch, ItemId, ListId, ListRecord, ListVersion,
    NewList, NewVersion, NewWorkLog, VersionId, WorkLog, WorkLogId, DEFAULT_ACTOR,
};
use std::collections::HashSet;

/// Rationale recorded on version 1
pub(crate) const CREATION_RATIONALE: &str = "Initial creation";

/// Rows written by `create`
pub(crate) struct Creation {
    pub record: ListRecord,
    pub version: ListVersion,
    pub log: WorkLog,
}

/// Rows written by `add_items`
pub(crate) struct Append {
    /// New items, already carrying list-unique ids
    pub items: Vec<Item>,
    pub version: ListVersion,
    pub log: WorkLog,
    pub outcome: AddItemsOutcome,
}

fn fresh_item_id(taken: &mut HashSet<ItemId>) -> ItemId {
    loop {
        let id = ItemId::new();
        if taken.insert(id) {
            return id;
        }
    }
}

fn work_log(list_id: ListId, version_number: Option<u32>, action: String, by: &str, now: u64) -> WorkLog {
    WorkLog {
        id: WorkLogId::new(),
        list_id,
        version_number,
        action,
        performed_by: by.to_string(),
        timestamp: now,
    }
}

pub(crate) fn plan_create(new_list: NewList, now: u64) -> Result<Creation, StoreError> {
    let category = new_list.validate()?;
    let actor = new_list.actor();

    let mut taken = HashSet::with_capacity(new_list.items.len());
    let items: Vec<Item> = new_list
        .items
        .into_iter()
        .map(|attributes| Item {
            id: fresh_item_id(&mut taken),
            attributes,
        })
        .collect();

    let record = ListRecord {
        id: ListId::new(),
        category,
        list_type: new_list.list_type,
        purpose: new_list.purpose.trim().to_string(),
        requester_name: new_list.requester_name,
        requester_role: new_list.requester_role,
        version_number: 1,
        created_at: now,
        updated_at: now,
        current_snapshot: items,
    };
    let version = ListVersion {
        id: VersionId::new(),
        list_id: record.id,
        version_number: 1,
        snapshot_len: record.item_count(),
        changes_summary: ChangesSummary::added(record.item_count()),
        rationale: CREATION_RATIONALE.to_string(),
        updated_by: actor.clone(),
        created_at: now,
    };
    let log = work_log(record.id, Some(1), "Created list".to_string(), &actor, now);

    Ok(Creation {
        record,
        version,
        log,
    })
}

pub(crate) fn plan_append(record: &ListRecord, batch: ItemBatch, now: u64) -> Result<Append, StoreError> {
    if batch.items.is_empty() {
        return Err(StoreError::Validation("No items provided".to_string()));
    }
    let actor = batch.actor();
    let rationale = batch.rationale();
    let added = batch.items.len();
    let version_number = record.version_number + 1;

    let mut taken: HashSet<ItemId> = record.current_snapshot.iter().map(|i| i.id).collect();
    let items: Vec<Item> = batch
        .items
        .into_iter()
        .map(|attributes| Item {
            id: fresh_item_id(&mut taken),
            attributes,
        })
        .collect();

    let version = ListVersion {
        id: VersionId::new(),
        list_id: record.id,
        version_number,
        snapshot_len: record.item_count() + added,
        changes_summary: ChangesSummary::added(added),
        rationale,
        updated_by: actor.clone(),
        created_at: now,
    };
    let log = work_log(
        record.id,
        Some(version_number),
        format!("Added {} items (version {})", added, version_number),
        &actor,
        now,
    );

    Ok(Append {
        items,
        version,
        log,
        outcome: AddItemsOutcome {
            added,
            version_number,
        },
    })
}

pub(crate) fn plan_version(record: &ListRecord, input: NewVersion, now: u64) -> Result<ListVersion, StoreError> {
    let expected = record.version_number + 1;
    if input.version_number != expected {
        return Err(StoreError::Validation(format!(
            "Version number must be {} (got {})",
            expected, input.version_number
        )));
    }
    let updated_by = if input.updated_by.trim().is_empty() {
        DEFAULT_ACTOR.to_string()
    } else {
        input.updated_by
    };

    Ok(ListVersion {
        id: VersionId::new(),
        list_id: record.id,
        version_number: expected,
        snapshot_len: record.item_count(),
        changes_summary: input.changes_summary,
        rationale: input.rationale,
        updated_by,
        created_at: now,
    })
}

pub(crate) fn plan_work_log(input: NewWorkLog, now: u64) -> Result<WorkLog, StoreError> {
    if input.action.trim().is_empty() {
        return Err(StoreError::Validation("Work log action cannot be empty".to_string()));
    }
    let by = if input.performed_by.trim().is_empty() {
        DEFAULT_ACTOR
    } else {
        input.performed_by.as_str()
    };
    Ok(work_log(input.list_id, None, input.action.clone(), by, now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pharmalist_domain::Attributes;

    #[test]
    fn test_append_ids_avoid_existing_ones() {
        let creation = plan_create(
            NewList::new("Customer", "Q4").with_items(vec![Attributes::new(); 3]),
            10,
        )
        .unwrap();
        let append = plan_append(&creation.record, ItemBatch::new(vec![Attributes::new(); 3]), 20).unwrap();

        let mut ids: HashSet<ItemId> = creation.record.current_snapshot.iter().map(|i| i.id).collect();
        for item in &append.items {
            assert!(ids.insert(item.id), "duplicate item id {}", item.id);
        }
        assert_eq!(append.version.snapshot_len, 6);
        assert_eq!(append.outcome.version_number, 2);
    }

    #[test]
    fn test_blank_actor_falls_back() {
        let log = plan_work_log(
            NewWorkLog {
                list_id: ListId::new(),
                action: "Checked".to_string(),
                performed_by: " ".to_string(),
            },
            5,
        )
        .unwrap();
        assert_eq!(log.performed_by, DEFAULT_ACTOR);
    }
}
