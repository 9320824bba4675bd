//! End-to-end tests of the HTTP client against a live server
//!
//! Each test serves the router on an ephemeral local port.

use pharmalist_domain::{
    Attributes, ChangesSummary, DomainKey, ItemBatch, ListId, ListUpdate, NewList, NewVersion,
    NewWorkLog,
};
use pharmalist_llm::{MockProvider, QueryRelay, QueryRequest};
use pharmalist_sdk::{ListPoller, ListService, LocalService, PharmaClient, SdkError};
use pharmalist_server::handlers::{create_router, AppState};
use pharmalist_store::MemoryStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

async fn spawn_server() -> PharmaClient {
    let state = AppState::new(
        MemoryStore::seeded(),
        QueryRelay::new(MockProvider::new("There are lists.")),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, create_router(state)).await.unwrap();
    });
    PharmaClient::new(format!("http://{}", addr)).unwrap()
}

fn item(name: &str, tier: &str) -> Attributes {
    let mut attrs = Attributes::new();
    attrs.insert("name".to_string(), name.into());
    attrs.insert("tier".to_string(), tier.into());
    attrs
}

#[tokio::test]
async fn test_health() {
    let client = spawn_server().await;
    let health = client.health().await.unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.list_count, 3);
}

#[tokio::test]
async fn test_create_add_items_and_read_back() {
    let client = spawn_server().await;

    let created = client
        .create(NewList::new("Customer", "Q4 List").with_requester("Anita", "Brand Manager"))
        .await
        .unwrap();
    assert_eq!(created.version_number, 1);
    assert_eq!(created.item_count, 0);

    let outcome = client
        .add_items(
            created.id,
            ItemBatch::new(vec![item("Dr. A", "A"), item("Dr. B", "B")]).by("Anita"),
        )
        .await
        .unwrap();
    assert_eq!(outcome.added, 2);
    assert_eq!(outcome.version_number, 2);

    let detail = client.get(created.id).await.unwrap();
    assert_eq!(detail.current_snapshot.len(), 2);
    assert_eq!(detail.current_snapshot[0].attribute("name"), Some("Dr. A"));
    assert_eq!(detail.versions.len(), 2);

    let logs = client.work_logs(created.id).await.unwrap();
    assert_eq!(logs.len(), 2);
}

#[tokio::test]
async fn test_errors_map_to_sdk_kinds() {
    let client = spawn_server().await;

    let err = client.get(ListId::new()).await.unwrap_err();
    assert!(err.is_not_found(), "{err:?}");

    let err = client.create(NewList::new("Sales", "Q4")).await.unwrap_err();
    assert!(matches!(err, SdkError::Validation(ref m) if m.contains("Sales")), "{err:?}");

    let lists = client.list(None).await.unwrap();
    let err = client
        .add_items(lists[0].id, ItemBatch::new(Vec::new()))
        .await
        .unwrap_err();
    assert!(matches!(err, SdkError::Validation(_)));
}

#[tokio::test]
async fn test_filter_update_delete() {
    let client = spawn_server().await;

    let customer = client.list(Some(DomainKey::Customer)).await.unwrap();
    assert_eq!(customer.len(), 1);

    let update = ListUpdate {
        purpose: Some("Q4 Cardiology Target List".to_string()),
        ..Default::default()
    };
    let updated = client.update(customer[0].id, update).await.unwrap();
    assert_eq!(updated.purpose, "Q4 Cardiology Target List");
    assert_eq!(updated.version_number, customer[0].version_number);

    assert!(client.delete(customer[0].id).await.unwrap());
    assert!(!client.delete(customer[0].id).await.unwrap());
    assert!(client.list(Some(DomainKey::Customer)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_manual_version_and_work_log() {
    let client = spawn_server().await;
    let target = client.list(None).await.unwrap().remove(0);

    let version = client
        .record_version(NewVersion {
            list_id: target.id,
            version_number: target.version_number + 1,
            changes_summary: ChangesSummary::default(),
            rationale: "Tier review".to_string(),
            updated_by: "Meera".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(version.version_number, target.version_number + 1);
    assert_eq!(
        client.versions(target.id).await.unwrap().len() as u32,
        version.version_number
    );

    let log = client
        .add_work_log(NewWorkLog {
            list_id: target.id,
            action: "Reviewed tiers".to_string(),
            performed_by: "Meera".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(client.work_logs(target.id).await.unwrap().last(), Some(&log));
}

#[tokio::test]
async fn test_reset_matches_local_reset() {
    let client = spawn_server().await;
    client
        .create(NewList::new("Data", "Segments"))
        .await
        .unwrap();

    let remote = client.reset().await.unwrap();
    let local = LocalService::new(MemoryStore::new()).reset().await.unwrap();
    assert_eq!(remote, local);
}

#[tokio::test]
async fn test_ask_returns_domain_sources() {
    let client = spawn_server().await;
    let answer = client
        .ask(QueryRequest::new("Which lists?").in_domain(DomainKey::Customer))
        .await
        .unwrap();
    assert_eq!(answer.answer, "There are lists.");
    assert_eq!(answer.sources, vec!["Q3 Cardiology Target List"]);
}

#[tokio::test]
async fn test_poller_over_http_sees_new_lists() {
    let client = Arc::new(spawn_server().await);
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

    let handle = ListPoller::new(Arc::clone(&client))
        .every(Duration::from_millis(20))
        .start(move |result| {
            let _ = tx.send(result.map(|lists| lists.len()));
        });

    assert_eq!(rx.recv().await.unwrap().unwrap(), 3);
    client.create(NewList::new("Marketing", "Summit")).await.unwrap();

    let saw_new_list = tokio::time::timeout(Duration::from_secs(5), async {
        while let Some(Ok(count)) = rx.recv().await {
            if count == 4 {
                return true;
            }
        }
        false
    })
    .await
    .unwrap_or(false);
    assert!(saw_new_list);
    handle.stop().await;
}
