//! SQLite-backed list store

use crate::plan::{plan_append, plan_create, plan_version, plan_work_log};
use crate::StoreError;
use pharmalist_domain::seed::default_dataset;
use pharmalist_domain::{
    unix_now, AddItemsOutcome, Attributes, ChangesSummary, DomainKey, Item, ItemBatch, ItemId,
    ListId, ListRecord, ListStore, ListUpdate, ListVersion, NewList, NewVersion, NewWorkLog,
    VersionId, WorkLog, WorkLogId,
};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use tracing::{debug, info};

const LIST_COLUMNS: &str = "id, category, list_type, purpose, requester_name, requester_role, \
                            version_number, created_at, updated_at";

const VERSION_COLUMNS: &str = "id, list_id, version_number, snapshot_len, added, removed, updated, \
                               rationale, updated_by, created_at";

/// SQLite-based implementation of `ListStore`
///
/// Every mutation runs in a single transaction, so a failed call leaves no
/// partial rows behind.
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Callers sharing one store across
/// tasks must wrap it in a mutex.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a store at the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use pharmalist_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("pharmalist.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open a store and load the sample dataset if it holds no lists
    pub fn open_seeded<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let mut store = Self::new(path)?;
        let count: i64 = store
            .conn
            .query_row("SELECT COUNT(*) FROM lists", [], |row| row.get(0))?;
        if count == 0 {
            store.reset_to_default()?;
            info!("seeded empty database with sample dataset");
        }
        Ok(store)
    }

    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }
}

/// Ids are stored as 16 big-endian bytes
fn id_to_bytes(value: u128) -> Vec<u8> {
    value.to_be_bytes().to_vec()
}

fn bytes_to_value(bytes: &[u8]) -> Result<u128, StoreError> {
    let arr: [u8; 16] = bytes.try_into().map_err(|_| {
        StoreError::InvalidData(format!("Expected 16 bytes for id, got {}", bytes.len()))
    })?;
    Ok(u128::from_be_bytes(arr))
}

fn conversion_error(idx: usize, ty: Type, e: StoreError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, ty, Box::new(e))
}

fn read_id(row: &Row, idx: usize) -> rusqlite::Result<u128> {
    let bytes: Vec<u8> = row.get(idx)?;
    bytes_to_value(&bytes).map_err(|e| conversion_error(idx, Type::Blob, e))
}

fn read_u64(row: &Row, idx: usize) -> rusqlite::Result<u64> {
    let value: i64 = row.get(idx)?;
    u64::try_from(value).map_err(|_| {
        conversion_error(
            idx,
            Type::Integer,
            StoreError::InvalidData(format!("Negative value {} in column {}", value, idx)),
        )
    })
}

fn read_usize(row: &Row, idx: usize) -> rusqlite::Result<usize> {
    read_u64(row, idx).map(|v| v as usize)
}

fn read_u32(row: &Row, idx: usize) -> rusqlite::Result<u32> {
    let value: i64 = row.get(idx)?;
    u32::try_from(value).map_err(|_| {
        conversion_error(
            idx,
            Type::Integer,
            StoreError::InvalidData(format!("Version number {} out of range", value)),
        )
    })
}

/// Row to list record, without its items
fn row_to_list(row: &Row) -> rusqlite::Result<ListRecord> {
    let category: String = row.get(1)?;
    let category = DomainKey::parse(&category).ok_or_else(|| {
        conversion_error(
            1,
            Type::Text,
            StoreError::InvalidData(format!("Unknown domain: {}", category)),
        )
    })?;

    Ok(ListRecord {
        id: ListId::from_value(read_id(row, 0)?),
        category,
        list_type: row.get(2)?,
        purpose: row.get(3)?,
        requester_name: row.get(4)?,
        requester_role: row.get(5)?,
        version_number: read_u32(row, 6)?,
        created_at: read_u64(row, 7)?,
        updated_at: read_u64(row, 8)?,
        current_snapshot: Vec::new(),
    })
}

fn row_to_version(row: &Row) -> rusqlite::Result<ListVersion> {
    Ok(ListVersion {
        id: VersionId::from_value(read_id(row, 0)?),
        list_id: ListId::from_value(read_id(row, 1)?),
        version_number: read_u32(row, 2)?,
        snapshot_len: read_usize(row, 3)?,
        changes_summary: ChangesSummary {
            added: read_usize(row, 4)?,
            removed: read_usize(row, 5)?,
            updated: read_usize(row, 6)?,
        },
        rationale: row.get(7)?,
        updated_by: row.get(8)?,
        created_at: read_u64(row, 9)?,
    })
}

fn row_to_work_log(row: &Row) -> rusqlite::Result<WorkLog> {
    let version_number: Option<i64> = row.get(2)?;
    Ok(WorkLog {
        id: WorkLogId::from_value(read_id(row, 0)?),
        list_id: ListId::from_value(read_id(row, 1)?),
        version_number: version_number.map(|v| v as u32),
        action: row.get(3)?,
        performed_by: row.get(4)?,
        timestamp: read_u64(row, 5)?,
    })
}

fn load_items(conn: &Connection, list_id: ListId) -> Result<Vec<Item>, StoreError> {
    let mut stmt =
        conn.prepare("SELECT id, attributes FROM list_items WHERE list_id = ?1 ORDER BY position")?;
    let rows = stmt
        .query_map(params![id_to_bytes(list_id.value())], |row| {
            Ok((read_id(row, 0)?, row.get::<_, String>(1)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(id, json)| {
            let attributes: Attributes = serde_json::from_str(&json)?;
            Ok(Item {
                id: ItemId::from_value(id),
                attributes,
            })
        })
        .collect()
}

fn fetch_list(conn: &Connection, id: ListId) -> Result<ListRecord, StoreError> {
    let record = conn
        .query_row(
            &format!("SELECT {} FROM lists WHERE id = ?1", LIST_COLUMNS),
            params![id_to_bytes(id.value())],
            row_to_list,
        )
        .optional()?;
    let mut record = record.ok_or_else(|| StoreError::NotFound(id.to_string()))?;
    record.current_snapshot = load_items(conn, id)?;
    Ok(record)
}

fn ensure_exists(conn: &Connection, id: ListId) -> Result<(), StoreError> {
    let exists = conn
        .query_row(
            "SELECT 1 FROM lists WHERE id = ?1",
            params![id_to_bytes(id.value())],
            |_| Ok(()),
        )
        .optional()?;
    exists.ok_or_else(|| StoreError::NotFound(id.to_string()))
}

fn insert_list(conn: &Connection, record: &ListRecord) -> Result<(), StoreError> {
    conn.execute(
        &format!(
            "INSERT INTO lists ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            LIST_COLUMNS
        ),
        params![
            id_to_bytes(record.id.value()),
            record.category.as_str(),
            record.list_type,
            record.purpose,
            record.requester_name,
            record.requester_role,
            record.version_number,
            record.created_at as i64,
            record.updated_at as i64,
        ],
    )?;
    insert_items(conn, record.id, 0, &record.current_snapshot)
}

fn insert_items(
    conn: &Connection,
    list_id: ListId,
    first_position: usize,
    items: &[Item],
) -> Result<(), StoreError> {
    let mut stmt = conn.prepare(
        "INSERT INTO list_items (list_id, position, id, attributes) VALUES (?1, ?2, ?3, ?4)",
    )?;
    let list_bytes = id_to_bytes(list_id.value());
    for (offset, item) in items.iter().enumerate() {
        stmt.execute(params![
            list_bytes,
            (first_position + offset) as i64,
            id_to_bytes(item.id.value()),
            serde_json::to_string(&item.attributes)?,
        ])?;
    }
    Ok(())
}

fn insert_version(conn: &Connection, version: &ListVersion) -> Result<(), StoreError> {
    conn.execute(
        &format!(
            "INSERT INTO list_versions ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            VERSION_COLUMNS
        ),
        params![
            id_to_bytes(version.id.value()),
            id_to_bytes(version.list_id.value()),
            version.version_number,
            version.snapshot_len as i64,
            version.changes_summary.added as i64,
            version.changes_summary.removed as i64,
            version.changes_summary.updated as i64,
            version.rationale,
            version.updated_by,
            version.created_at as i64,
        ],
    )?;
    Ok(())
}

fn insert_work_log(conn: &Connection, log: &WorkLog) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO work_logs (id, list_id, version_number, action, performed_by, timestamp)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            id_to_bytes(log.id.value()),
            id_to_bytes(log.list_id.value()),
            log.version_number,
            log.action,
            log.performed_by,
            log.timestamp as i64,
        ],
    )?;
    Ok(())
}

fn set_version(conn: &Connection, id: ListId, version_number: u32, now: u64) -> Result<(), StoreError> {
    conn.execute(
        "UPDATE lists SET version_number = ?1, updated_at = ?2 WHERE id = ?3",
        params![version_number, now as i64, id_to_bytes(id.value())],
    )?;
    Ok(())
}

impl ListStore for SqliteStore {
    type Error = StoreError;

    fn create(&mut self, new_list: NewList) -> Result<ListRecord, Self::Error> {
        let creation = plan_create(new_list, unix_now())?;

        let tx = self.conn.transaction()?;
        insert_list(&tx, &creation.record)?;
        insert_version(&tx, &creation.version)?;
        insert_work_log(&tx, &creation.log)?;
        tx.commit()?;

        let record = creation.record;
        debug!(list_id = %record.id, category = %record.category, items = record.item_count(), "created list");
        Ok(record)
    }

    fn get(&self, id: ListId) -> Result<ListRecord, Self::Error> {
        fetch_list(&self.conn, id)
    }

    fn list(&self, domain: Option<DomainKey>) -> Result<Vec<ListRecord>, Self::Error> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM lists WHERE ?1 IS NULL OR category = ?1 ORDER BY seq",
            LIST_COLUMNS
        ))?;
        let mut records = stmt
            .query_map(params![domain.map(|d| d.as_str())], row_to_list)?
            .collect::<Result<Vec<_>, _>>()?;
        for record in &mut records {
            record.current_snapshot = load_items(&self.conn, record.id)?;
        }
        Ok(records)
    }

    fn update(&mut self, id: ListId, update: ListUpdate) -> Result<ListRecord, Self::Error> {
        let mut record = fetch_list(&self.conn, id)?;
        update.apply(&mut record, unix_now())?;

        self.conn.execute(
            "UPDATE lists SET category = ?1, list_type = ?2, purpose = ?3, requester_name = ?4,
             requester_role = ?5, updated_at = ?6 WHERE id = ?7",
            params![
                record.category.as_str(),
                record.list_type,
                record.purpose,
                record.requester_name,
                record.requester_role,
                record.updated_at as i64,
                id_to_bytes(id.value()),
            ],
        )?;
        debug!(list_id = %id, "updated list metadata");
        Ok(record)
    }

    fn add_items(&mut self, id: ListId, batch: ItemBatch) -> Result<AddItemsOutcome, Self::Error> {
        let tx = self.conn.transaction()?;
        let record = fetch_list(&tx, id)?;
        let now = unix_now();
        let append = plan_append(&record, batch, now)?;

        insert_items(&tx, id, record.item_count(), &append.items)?;
        set_version(&tx, id, append.outcome.version_number, now)?;
        insert_version(&tx, &append.version)?;
        insert_work_log(&tx, &append.log)?;
        tx.commit()?;

        debug!(list_id = %id, added = append.outcome.added, version_number = append.outcome.version_number, "appended items");
        Ok(append.outcome)
    }

    fn delete(&mut self, id: ListId) -> Result<bool, Self::Error> {
        // Items, versions and work logs go with the list via ON DELETE CASCADE
        let removed = self
            .conn
            .execute("DELETE FROM lists WHERE id = ?1", params![id_to_bytes(id.value())])?;
        if removed > 0 {
            debug!(list_id = %id, "deleted list");
        }
        Ok(removed > 0)
    }

    fn reset_to_default(&mut self) -> Result<Vec<ListRecord>, Self::Error> {
        let data = default_dataset();

        let tx = self.conn.transaction()?;
        tx.execute_batch(
            "DELETE FROM work_logs; DELETE FROM list_versions; DELETE FROM list_items; DELETE FROM lists;",
        )?;
        for record in &data.lists {
            insert_list(&tx, record)?;
        }
        for version in &data.versions {
            insert_version(&tx, version)?;
        }
        for log in &data.work_logs {
            insert_work_log(&tx, log)?;
        }
        tx.commit()?;

        debug!(lists = data.lists.len(), "reset database to sample dataset");
        Ok(data.lists)
    }

    fn versions(&self, id: ListId) -> Result<Vec<ListVersion>, Self::Error> {
        ensure_exists(&self.conn, id)?;
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM list_versions WHERE list_id = ?1 ORDER BY version_number",
            VERSION_COLUMNS
        ))?;
        let versions = stmt
            .query_map(params![id_to_bytes(id.value())], row_to_version)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(versions)
    }

    fn record_version(&mut self, version: NewVersion) -> Result<ListVersion, Self::Error> {
        let tx = self.conn.transaction()?;
        let record = fetch_list(&tx, version.list_id)?;
        let now = unix_now();
        let created = plan_version(&record, version, now)?;

        set_version(&tx, created.list_id, created.version_number, now)?;
        insert_version(&tx, &created)?;
        tx.commit()?;
        Ok(created)
    }

    fn work_logs(&self, id: ListId) -> Result<Vec<WorkLog>, Self::Error> {
        ensure_exists(&self.conn, id)?;
        let mut stmt = self.conn.prepare(
            "SELECT id, list_id, version_number, action, performed_by, timestamp
             FROM work_logs WHERE list_id = ?1 ORDER BY seq",
        )?;
        let logs = stmt
            .query_map(params![id_to_bytes(id.value())], row_to_work_log)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(logs)
    }

    fn add_work_log(&mut self, entry: NewWorkLog) -> Result<WorkLog, Self::Error> {
        ensure_exists(&self.conn, entry.list_id)?;
        let log = plan_work_log(entry, unix_now())?;
        insert_work_log(&self.conn, &log)?;
        Ok(log)
    }
}
