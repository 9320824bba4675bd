//! In-process list service over a local store.

use crate::error::SdkError;
use crate::ListService;
use async_trait::async_trait;
use pharmalist_domain::{
    AddItemsOutcome, DomainKey, ItemBatch, ListDetail, ListId, ListStore, ListSummary, ListUpdate,
    ListVersion, NewList, NewVersion, NewWorkLog, WorkLog,
};
use pharmalist_llm::{EchoProvider, QueryAnswer, QueryRelay, QueryRequest};
use pharmalist_store::StoreError;
use std::sync::{Arc, Mutex};

/// [`ListService`] backed by a store in this process
///
/// The offline counterpart of [`PharmaClient`](crate::PharmaClient): same
/// operations, same error kinds, no network. Questions go to an echoing
/// provider unless another relay is supplied.
pub struct LocalService<S> {
    store: Arc<Mutex<S>>,
    relay: QueryRelay,
}

impl<S> Clone for LocalService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            relay: self.relay.clone(),
        }
    }
}

impl<S> LocalService<S>
where
    S: ListStore<Error = StoreError> + Send,
{
    /// Wrap a store
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            relay: QueryRelay::new(EchoProvider),
        }
    }

    /// Answer questions through `relay` instead of the echo provider
    pub fn with_relay(mut self, relay: QueryRelay) -> Self {
        self.relay = relay;
        self
    }

    fn with_store<T>(&self, op: impl FnOnce(&mut S) -> Result<T, StoreError>) -> Result<T, SdkError> {
        let mut guard = self
            .store
            .lock()
            .map_err(|_| SdkError::Storage("store lock poisoned".to_string()))?;
        Ok(op(&mut guard)?)
    }
}

#[async_trait]
impl<S> ListService for LocalService<S>
where
    S: ListStore<Error = StoreError> + Send,
{
    async fn list(&self, domain: Option<DomainKey>) -> Result<Vec<ListSummary>, SdkError> {
        let lists = self.with_store(|store| store.list(domain))?;
        Ok(lists.iter().map(ListSummary::from).collect())
    }

    async fn get(&self, id: ListId) -> Result<ListDetail, SdkError> {
        let (record, versions) = self.with_store(|store| Ok((store.get(id)?, store.versions(id)?)))?;
        Ok(ListDetail::new(record, versions))
    }

    async fn create(&self, new_list: NewList) -> Result<ListSummary, SdkError> {
        let record = self.with_store(|store| store.create(new_list))?;
        Ok(ListSummary::from(&record))
    }

    async fn update(&self, id: ListId, update: ListUpdate) -> Result<ListSummary, SdkError> {
        let record = self.with_store(|store| store.update(id, update))?;
        Ok(ListSummary::from(&record))
    }

    async fn add_items(&self, id: ListId, batch: ItemBatch) -> Result<AddItemsOutcome, SdkError> {
        self.with_store(|store| store.add_items(id, batch))
    }

    async fn delete(&self, id: ListId) -> Result<bool, SdkError> {
        self.with_store(|store| store.delete(id))
    }

    async fn versions(&self, id: ListId) -> Result<Vec<ListVersion>, SdkError> {
        self.with_store(|store| store.versions(id))
    }

    async fn record_version(&self, version: NewVersion) -> Result<ListVersion, SdkError> {
        self.with_store(|store| store.record_version(version))
    }

    async fn work_logs(&self, id: ListId) -> Result<Vec<WorkLog>, SdkError> {
        self.with_store(|store| store.work_logs(id))
    }

    async fn add_work_log(&self, entry: NewWorkLog) -> Result<WorkLog, SdkError> {
        self.with_store(|store| store.add_work_log(entry))
    }

    async fn reset(&self) -> Result<Vec<ListSummary>, SdkError> {
        let lists = self.with_store(|store| store.reset_to_default())?;
        Ok(lists.iter().map(ListSummary::from).collect())
    }

    async fn ask(&self, request: QueryRequest) -> Result<QueryAnswer, SdkError> {
        let titles = self
            .with_store(|store| store.list(request.domain))?
            .into_iter()
            .map(|l| l.purpose)
            .collect();
        Ok(self.relay.ask(request.with_context(titles)).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pharmalist_llm::MockProvider;
    use pharmalist_store::MemoryStore;

    #[tokio::test]
    async fn test_create_then_add_items() {
        let service = LocalService::new(MemoryStore::new());
        let created = service
            .create(NewList::new("Customer", "Q4 List").with_requester("Anita", "Brand Manager"))
            .await
            .unwrap();
        assert_eq!(created.version_number, 1);

        let mut item = pharmalist_domain::Attributes::new();
        item.insert("name".to_string(), "Dr. A".into());
        let outcome = service
            .add_items(created.id, ItemBatch::new(vec![item]).by("Anita"))
            .await
            .unwrap();
        assert_eq!(outcome.added, 1);
        assert_eq!(outcome.version_number, 2);

        let detail = service.get(created.id).await.unwrap();
        assert_eq!(detail.current_snapshot.len(), 1);
        assert_eq!(detail.versions.len(), 2);
    }

    #[tokio::test]
    async fn test_errors_keep_their_kind() {
        let service = LocalService::new(MemoryStore::seeded());
        let err = service.get(ListId::new()).await.unwrap_err();
        assert!(err.is_not_found());

        let err = service.create(NewList::new("Sales", "Q4")).await.unwrap_err();
        assert!(matches!(err, SdkError::Validation(_)));
    }

    #[tokio::test]
    async fn test_clones_share_the_store() {
        let service = LocalService::new(MemoryStore::seeded());
        let other = service.clone();
        let lists = service.list(None).await.unwrap();
        assert!(other.delete(lists[0].id).await.unwrap());
        assert_eq!(service.list(None).await.unwrap().len(), lists.len() - 1);
    }

    #[tokio::test]
    async fn test_ask_cites_domain_titles() {
        let service = LocalService::new(MemoryStore::seeded())
            .with_relay(QueryRelay::new(MockProvider::new("One list")));
        let answer = service
            .ask(QueryRequest::new("Which lists?").in_domain(DomainKey::Customer))
            .await
            .unwrap();
        assert_eq!(answer.answer, "One list");
        assert_eq!(answer.sources, vec!["Q3 Cardiology Target List"]);
    }
}
