//! In-memory list catalog
//!
//! Holds every list with its versions and work logs. The catalog is also the
//! serialized shape of the JSON fallback blob.

use crate::plan::{plan_append, plan_create, plan_version, plan_work_log};
use crate::StoreError;
use pharmalist_domain::seed::default_dataset;
use pharmalist_domain::{
    unix_now, AddItemsOutcome, DomainKey, ItemBatch, ListId, ListRecord, ListStore, ListUpdate,
    ListVersion, NewList, NewVersion, NewWorkLog, WorkLog,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Complete store state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    lists: Vec<ListRecord>,
    #[serde(default)]
    versions: Vec<ListVersion>,
    #[serde(default)]
    work_logs: Vec<WorkLog>,
}

impl Catalog {
    /// Empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog holding the sample dataset
    pub fn seeded() -> Self {
        let data = default_dataset();
        Self {
            lists: data.lists,
            versions: data.versions,
            work_logs: data.work_logs,
        }
    }

    /// Number of lists
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    /// Whether the catalog holds no lists
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    fn position(&self, id: ListId) -> Result<usize, StoreError> {
        self.lists
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

impl ListStore for Catalog {
    type Error = StoreError;

    fn create(&mut self, new_list: NewList) -> Result<ListRecord, Self::Error> {
        let creation = plan_create(new_list, unix_now())?;
        let record = creation.record;

        self.versions.push(creation.version);
        self.work_logs.push(creation.log);
        self.lists.push(record.clone());

        debug!(list_id = %record.id, category = %record.category, items = record.item_count(), "created list");
        Ok(record)
    }

    fn get(&self, id: ListId) -> Result<ListRecord, Self::Error> {
        let pos = self.position(id)?;
        Ok(self.lists[pos].clone())
    }

    fn list(&self, domain: Option<DomainKey>) -> Result<Vec<ListRecord>, Self::Error> {
        Ok(self
            .lists
            .iter()
            .filter(|l| domain.map_or(true, |d| l.category == d))
            .cloned()
            .collect())
    }

    fn update(&mut self, id: ListId, update: ListUpdate) -> Result<ListRecord, Self::Error> {
        let pos = self.position(id)?;
        let record = &mut self.lists[pos];
        update.apply(record, unix_now())?;
        debug!(list_id = %id, "updated list metadata");
        Ok(record.clone())
    }

    fn add_items(&mut self, id: ListId, batch: ItemBatch) -> Result<AddItemsOutcome, Self::Error> {
        let pos = self.position(id)?;
        let now = unix_now();
        let append = plan_append(&self.lists[pos], batch, now)?;

        let record = &mut self.lists[pos];
        record.current_snapshot.extend(append.items);
        record.version_number = append.outcome.version_number;
        record.updated_at = now;
        self.versions.push(append.version);
        self.work_logs.push(append.log);

        debug!(list_id = %id, added = append.outcome.added, version_number = append.outcome.version_number, "appended items");
        Ok(append.outcome)
    }

    fn delete(&mut self, id: ListId) -> Result<bool, Self::Error> {
        let before = self.lists.len();
        self.lists.retain(|l| l.id != id);
        let removed = self.lists.len() != before;
        if removed {
            self.versions.retain(|v| v.list_id != id);
            self.work_logs.retain(|w| w.list_id != id);
            debug!(list_id = %id, "deleted list");
        }
        Ok(removed)
    }

    fn reset_to_default(&mut self) -> Result<Vec<ListRecord>, Self::Error> {
        *self = Catalog::seeded();
        debug!(lists = self.lists.len(), "reset catalog to sample dataset");
        Ok(self.lists.clone())
    }

    fn versions(&self, id: ListId) -> Result<Vec<ListVersion>, Self::Error> {
        self.position(id)?;
        Ok(self
            .versions
            .iter()
            .filter(|v| v.list_id == id)
            .cloned()
            .collect())
    }

    fn record_version(&mut self, version: NewVersion) -> Result<ListVersion, Self::Error> {
        let pos = self.position(version.list_id)?;
        let now = unix_now();
        let created = plan_version(&self.lists[pos], version, now)?;

        let record = &mut self.lists[pos];
        record.version_number = created.version_number;
        record.updated_at = now;
        self.versions.push(created.clone());
        Ok(created)
    }

    fn work_logs(&self, id: ListId) -> Result<Vec<WorkLog>, Self::Error> {
        self.position(id)?;
        Ok(self
            .work_logs
            .iter()
            .filter(|w| w.list_id == id)
            .cloned()
            .collect())
    }

    fn add_work_log(&mut self, entry: NewWorkLog) -> Result<WorkLog, Self::Error> {
        self.position(entry.list_id)?;
        let log = plan_work_log(entry, unix_now())?;
        self.work_logs.push(log.clone());
        Ok(log)
    }
}
