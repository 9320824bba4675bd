//! Integration tests for pharmalist-store
//!
//! Every behavior is checked against both backends through the `ListStore` trait.

use pharmalist_domain::{
    snapshot_at, Attributes, DomainKey, ItemBatch, ListId, ListStore, ListUpdate, NewList,
    DEFAULT_ACTOR, DEFAULT_RATIONALE,
};
use pharmalist_store::{MemoryStore, SqliteStore, StoreError};
use proptest::prelude::*;
use serde_json::json;
use std::collections::HashSet;

fn contact(name: &str, specialty: &str) -> Attributes {
    let mut map = Attributes::new();
    map.insert("name".to_string(), json!(name));
    map.insert("specialty".to_string(), json!(specialty));
    map
}

fn backends() -> Vec<(&'static str, Box<dyn ListStore<Error = StoreError>>)> {
    vec![
        ("memory", Box::new(MemoryStore::new())),
        ("sqlite", Box::new(SqliteStore::new(":memory:").unwrap())),
    ]
}

#[test]
fn test_create_starts_at_version_one() {
    for (name, mut store) in backends() {
        let list = store
            .create(
                NewList::new("Customer", "Q4 Cardiology Targets")
                    .with_list_type("Target Lists")
                    .with_requester("Anita", "Brand Manager")
                    .with_items(vec![contact("Dr. A", "Cardiology"), contact("Dr. B", "Oncology")]),
            )
            .unwrap();

        assert_eq!(list.version_number, 1, "{name}");
        assert_eq!(list.item_count(), 2, "{name}");
        assert_eq!(list.created_at, list.updated_at, "{name}");

        let versions = store.versions(list.id).unwrap();
        assert_eq!(versions.len(), 1, "{name}");
        assert_eq!(versions[0].changes_summary.added, 2, "{name}");
        assert_eq!(versions[0].rationale, "Initial creation", "{name}");

        let fetched = store.get(list.id).unwrap();
        assert_eq!(fetched, list, "{name}");
    }
}

#[test]
fn test_create_rejects_bad_input() {
    for (name, mut store) in backends() {
        let unknown = store.create(NewList::new("Sales", "Q4")).unwrap_err();
        assert!(unknown.is_validation(), "{name}: {unknown}");

        let blank = store.create(NewList::new("Customer", "   ")).unwrap_err();
        assert!(blank.is_validation(), "{name}: {blank}");

        let wrong_type = store
            .create(NewList::new("Account", "Q4").with_list_type("Target Lists"))
            .unwrap_err();
        assert!(wrong_type.is_validation(), "{name}: {wrong_type}");

        assert!(store.list(None).unwrap().is_empty(), "{name}");
    }
}

#[test]
fn test_create_accepts_legacy_category() {
    for (name, mut store) in backends() {
        let list = store.create(NewList::new("Customer/HCP", "Legacy")).unwrap();
        assert_eq!(list.category, DomainKey::Customer, "{name}");
    }
}

#[test]
fn test_add_items_appends_and_versions() {
    for (name, mut store) in backends() {
        let list = store
            .create(NewList::new("Customer", "Calls").with_items(vec![contact("Dr. A", "Cardiology")]))
            .unwrap();

        let outcome = store
            .add_items(
                list.id,
                ItemBatch::new(vec![contact("Dr. B", "Neurology"), contact("Dr. C", "Oncology")]),
            )
            .unwrap();
        assert_eq!(outcome.added, 2, "{name}");
        assert_eq!(outcome.version_number, 2, "{name}");

        let fetched = store.get(list.id).unwrap();
        assert_eq!(fetched.version_number, 2, "{name}");
        assert!(fetched.updated_at >= list.updated_at, "{name}");
        let names: Vec<_> = fetched
            .current_snapshot
            .iter()
            .filter_map(|i| i.attribute("name"))
            .collect();
        assert_eq!(names, vec!["Dr. A", "Dr. B", "Dr. C"], "{name}");

        let versions = store.versions(list.id).unwrap();
        let latest = versions.last().unwrap();
        assert_eq!(latest.rationale, DEFAULT_RATIONALE, "{name}");
        assert_eq!(latest.updated_by, DEFAULT_ACTOR, "{name}");
        assert_eq!(latest.snapshot_len, 3, "{name}");

        let logs = store.work_logs(list.id).unwrap();
        assert_eq!(logs.last().unwrap().action, "Added 2 items (version 2)", "{name}");
    }
}

#[test]
fn test_add_items_to_unknown_list() {
    for (name, mut store) in backends() {
        let err = store
            .add_items(ListId::new(), ItemBatch::new(vec![contact("Dr. A", "Cardiology")]))
            .unwrap_err();
        assert!(err.is_not_found(), "{name}: {err}");
    }
}

#[test]
fn test_list_filters_by_domain_in_insertion_order() {
    for (name, mut store) in backends() {
        let a = store.create(NewList::new("Customer", "First")).unwrap();
        store.create(NewList::new("Marketing", "Event")).unwrap();
        let c = store.create(NewList::new("customer", "Second")).unwrap();

        let all = store.list(None).unwrap();
        assert_eq!(all.len(), 3, "{name}");

        let customers: Vec<_> = store
            .list(Some(DomainKey::Customer))
            .unwrap()
            .into_iter()
            .map(|l| l.id)
            .collect();
        assert_eq!(customers, vec![a.id, c.id], "{name}");
        assert!(store.list(Some(DomainKey::Data)).unwrap().is_empty(), "{name}");
    }
}

#[test]
fn test_update_keeps_version() {
    for (name, mut store) in backends() {
        let list = store.create(NewList::new("Account", "Formulary")).unwrap();
        let updated = store
            .update(
                list.id,
                ListUpdate {
                    purpose: Some("North Zone Formulary".to_string()),
                    list_type: Some("IDN/Health System Lists".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.purpose, "North Zone Formulary", "{name}");
        assert_eq!(updated.version_number, 1, "{name}");
        assert_eq!(store.get(list.id).unwrap(), updated, "{name}");
    }
}

#[test]
fn test_delete_is_idempotent() {
    for (name, mut store) in backends() {
        let list = store.create(NewList::new("Data", "Segments")).unwrap();
        assert!(store.delete(list.id).unwrap(), "{name}");
        assert!(!store.delete(list.id).unwrap(), "{name}");
        assert!(store.get(list.id).unwrap_err().is_not_found(), "{name}");
        assert!(store.versions(list.id).unwrap_err().is_not_found(), "{name}");
    }
}

#[test]
fn test_reset_discards_user_lists() {
    for (name, mut store) in backends() {
        let mine = store.create(NewList::new("Customer", "Mine")).unwrap();
        let seeded = store.reset_to_default().unwrap();

        assert_eq!(seeded.len(), 3, "{name}");
        assert!(store.get(mine.id).unwrap_err().is_not_found(), "{name}");
        assert_eq!(store.list(None).unwrap(), seeded, "{name}");

        // Reset twice yields the same state
        assert_eq!(store.reset_to_default().unwrap(), seeded, "{name}");
    }
}

#[test]
fn test_historical_snapshots() {
    for (name, mut store) in backends() {
        let list = store
            .create(NewList::new("Customer", "Calls").with_items(vec![contact("Dr. A", "Cardiology")]))
            .unwrap();
        store
            .add_items(list.id, ItemBatch::new(vec![contact("Dr. B", "Neurology")]))
            .unwrap();

        let record = store.get(list.id).unwrap();
        let versions = store.versions(list.id).unwrap();
        assert_eq!(snapshot_at(&record, &versions, 1).unwrap().len(), 1, "{name}");
        assert_eq!(snapshot_at(&record, &versions, 2).unwrap().len(), 2, "{name}");
        assert!(snapshot_at(&record, &versions, 3).is_none(), "{name}");
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_version_number_tracks_history(batches in prop::collection::vec(0usize..4, 0..6)) {
        for (_, mut store) in backends() {
            let list = store.create(NewList::new("Customer", "Prop")).unwrap();
            let mut expected_items = 0;
            for size in &batches {
                let items = vec![contact("Dr. P", "Cardiology"); *size];
                let result = store.add_items(list.id, ItemBatch::new(items));
                prop_assert_eq!(result.is_ok(), *size > 0);
                expected_items += size;
            }

            let record = store.get(list.id).unwrap();
            let versions = store.versions(list.id).unwrap();
            prop_assert_eq!(record.version_number as usize, versions.len());
            prop_assert_eq!(record.item_count(), expected_items);

            let numbers: Vec<u32> = versions.iter().map(|v| v.version_number).collect();
            let expected: Vec<u32> = (1..=versions.len() as u32).collect();
            prop_assert_eq!(numbers, expected);

            let ids: HashSet<_> = record.current_snapshot.iter().map(|i| i.id).collect();
            prop_assert_eq!(ids.len(), record.item_count());
        }
    }
}
