//! In-memory store with optional JSON blob persistence

use crate::catalog::Catalog;
use crate::{StoreError, STORAGE_KEY};
use pharmalist_domain::{
    AddItemsOutcome, DomainKey, ItemBatch, ListId, ListRecord, ListStore, ListUpdate, ListVersion,
    NewList, NewVersion, NewWorkLog, WorkLog,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// In-memory implementation of `ListStore`
///
/// Without a blob path this is a plain test double. With one, the whole
/// catalog is rewritten to `<dir>/pharma_lists_store.json` after every
/// successful mutation. The blob is a development convenience, not a
/// durability contract: a crash between mutation and write loses the mutation.
#[derive(Debug, Default)]
pub struct MemoryStore {
    catalog: Catalog,
    blob_path: Option<PathBuf>,
}

impl MemoryStore {
    /// Create an empty, non-persistent store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a non-persistent store holding the sample dataset
    pub fn seeded() -> Self {
        Self {
            catalog: Catalog::seeded(),
            blob_path: None,
        }
    }

    /// Open the blob stored under [`STORAGE_KEY`] in `dir`
    ///
    /// A missing blob is created from the sample dataset.
    ///
    /// # Errors
    /// Returns error if the directory or blob cannot be read or written, or
    /// if the blob is not a valid catalog
    pub fn open_blob<P: AsRef<Path>>(dir: P) -> Result<Self, StoreError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = Self::blob_path_in(dir);

        if path.exists() {
            let contents = fs::read_to_string(&path)?;
            let catalog: Catalog = serde_json::from_str(&contents)?;
            info!(path = %path.display(), lists = catalog.len(), "loaded list blob");
            Ok(Self {
                catalog,
                blob_path: Some(path),
            })
        } else {
            let store = Self {
                catalog: Catalog::seeded(),
                blob_path: Some(path),
            };
            store.persist()?;
            info!("seeded new list blob");
            Ok(store)
        }
    }

    /// Path of the blob inside `dir`
    pub fn blob_path_in(dir: &Path) -> PathBuf {
        dir.join(format!("{}.json", STORAGE_KEY))
    }

    /// Path of the blob backing this store, if any
    pub fn blob_path(&self) -> Option<&Path> {
        self.blob_path.as_deref()
    }

    /// Read-only view of the whole state
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn persist(&self) -> Result<(), StoreError> {
        self.write_blob(&self.catalog)
    }

    fn write_blob(&self, catalog: &Catalog) -> Result<(), StoreError> {
        let Some(path) = &self.blob_path else {
            return Ok(());
        };
        let contents = serde_json::to_string(catalog)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, path)?;
        debug!(path = %path.display(), "persisted list blob");
        Ok(())
    }

    /// Run a mutation and keep it only once it is persisted
    ///
    /// The mutation runs on a copy; a failed blob write leaves the
    /// in-memory catalog as it was.
    fn mutate<T>(
        &mut self,
        op: impl FnOnce(&mut Catalog) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        if self.blob_path.is_none() {
            return op(&mut self.catalog);
        }

        let mut next = self.catalog.clone();
        let value = op(&mut next)?;
        self.write_blob(&next)?;
        self.catalog = next;
        Ok(value)
    }
}

impl ListStore for MemoryStore {
    type Error = StoreError;

    fn create(&mut self, new_list: NewList) -> Result<ListRecord, Self::Error> {
        self.mutate(|c| c.create(new_list))
    }

    fn get(&self, id: ListId) -> Result<ListRecord, Self::Error> {
        self.catalog.get(id)
    }

    fn list(&self, domain: Option<DomainKey>) -> Result<Vec<ListRecord>, Self::Error> {
        self.catalog.list(domain)
    }

    fn update(&mut self, id: ListId, update: ListUpdate) -> Result<ListRecord, Self::Error> {
        self.mutate(|c| c.update(id, update))
    }

    fn add_items(&mut self, id: ListId, batch: ItemBatch) -> Result<AddItemsOutcome, Self::Error> {
        self.mutate(|c| c.add_items(id, batch))
    }

    fn delete(&mut self, id: ListId) -> Result<bool, Self::Error> {
        self.mutate(|c| c.delete(id))
    }

    fn reset_to_default(&mut self) -> Result<Vec<ListRecord>, Self::Error> {
        self.mutate(|c| c.reset_to_default())
    }

    fn versions(&self, id: ListId) -> Result<Vec<ListVersion>, Self::Error> {
        self.catalog.versions(id)
    }

    fn record_version(&mut self, version: NewVersion) -> Result<ListVersion, Self::Error> {
        self.mutate(|c| c.record_version(version))
    }

    fn work_logs(&self, id: ListId) -> Result<Vec<WorkLog>, Self::Error> {
        self.catalog.work_logs(id)
    }

    fn add_work_log(&mut self, entry: NewWorkLog) -> Result<WorkLog, Self::Error> {
        self.mutate(|c| c.add_work_log(entry))
    }
}
