//! HTTP request handlers for the list API.
//!
//! Every handler locks the shared store for the duration of one store call,
//! so mutations never interleave. Errors become a JSON `{ "error": ... }`
//! body with a status derived from the error kind.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use pharmalist_domain::{
    AddItemsOutcome, DeleteResponse, DomainConfig, DomainKey, ItemBatch, ListDetail, ListId,
    ListStore, ListSummary, ListUpdate, ListVersion, NewList, NewVersion, NewWorkLog, WorkLog,
};
use pharmalist_llm::{LlmError, QueryAnswer, QueryRelay, QueryRequest};
use pharmalist_store::StoreError;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tracing::error;

/// Store shared by all handlers
pub type DynStore = dyn ListStore<Error = StoreError> + Send;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// List store, serialized behind a mutex
    pub store: Arc<Mutex<Box<DynStore>>>,
    /// Relay answering `/query`
    pub relay: QueryRelay,
}

impl AppState {
    /// Build state around a store and a relay
    pub fn new(store: impl ListStore<Error = StoreError> + Send + 'static, relay: QueryRelay) -> Self {
        let store: Box<DynStore> = Box::new(store);
        Self {
            store: Arc::new(Mutex::new(store)),
            relay,
        }
    }

    /// Run one store call under the lock
    fn with_store<T>(
        &self,
        op: impl FnOnce(&mut DynStore) -> Result<T, StoreError>,
    ) -> Result<T, AppError> {
        let mut guard = self
            .store
            .lock()
            .map_err(|_| AppError::InternalError("store lock poisoned".to_string()))?;
        Ok(op(&mut **guard)?)
    }
}

/// Query string of `GET /lists`
#[derive(Debug, Deserialize)]
pub struct ListFilter {
    /// Domain key or legacy category name
    pub category: Option<String>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Number of stored lists
    pub list_count: usize,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Store-related error
    StoreError(StoreError),
    /// Answer provider error
    LlmError(LlmError),
    /// Malformed request
    BadRequest(String),
    /// Internal server error
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::StoreError(e) if e.is_not_found() => (StatusCode::NOT_FOUND, e.to_string()),
            AppError::StoreError(e) if e.is_validation() => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::StoreError(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::LlmError(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        error!(status = status.as_u16(), error = %message, "request failed");
        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::StoreError(e)
    }
}

impl From<LlmError> for AppError {
    fn from(e: LlmError) -> Self {
        AppError::LlmError(e)
    }
}

fn parse_id(raw: &str) -> Result<ListId, AppError> {
    ListId::from_string(raw).map_err(|_| AppError::BadRequest(format!("Invalid list id: {}", raw)))
}

fn parse_domain(raw: &str) -> Result<DomainKey, AppError> {
    DomainKey::resolve(raw).ok_or_else(|| AppError::BadRequest(format!("Unknown domain: '{}'", raw)))
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Result<Json<HealthCheckResponse>, AppError> {
    let list_count = state.with_store(|store| store.list(None))?.len();
    Ok(Json(HealthCheckResponse {
        status: "healthy".to_string(),
        list_count,
    }))
}

/// GET /domains - the static registry
async fn list_domains() -> Json<&'static [DomainConfig]> {
    Json(pharmalist_domain::registry::all_domains())
}

/// GET /lists?category=
async fn list_lists(
    State(state): State<AppState>,
    Query(filter): Query<ListFilter>,
) -> Result<Json<Vec<ListSummary>>, AppError> {
    let domain = filter
        .category
        .as_deref()
        .filter(|c| !c.is_empty())
        .map(parse_domain)
        .transpose()?;
    let lists = state.with_store(|store| store.list(domain))?;
    Ok(Json(lists.iter().map(ListSummary::from).collect()))
}

/// POST /lists
async fn create_list(
    State(state): State<AppState>,
    Json(new_list): Json<NewList>,
) -> Result<(StatusCode, Json<ListSummary>), AppError> {
    let record = state.with_store(|store| store.create(new_list))?;
    Ok((StatusCode::CREATED, Json(ListSummary::from(&record))))
}

/// GET /lists/:id - summary, items and versions
async fn get_list(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ListDetail>, AppError> {
    let id = parse_id(&id)?;
    let (record, versions) = state.with_store(|store| Ok((store.get(id)?, store.versions(id)?)))?;
    Ok(Json(ListDetail::new(record, versions)))
}

/// PUT /lists/:id
async fn update_list(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<ListUpdate>,
) -> Result<Json<ListSummary>, AppError> {
    let id = parse_id(&id)?;
    let record = state.with_store(|store| store.update(id, update))?;
    Ok(Json(ListSummary::from(&record)))
}

/// DELETE /lists/:id
async fn delete_list(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let id = parse_id(&id)?;
    let success = state.with_store(|store| store.delete(id))?;
    Ok(Json(DeleteResponse { success }))
}

/// POST /lists/:id/items
async fn add_items(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(batch): Json<ItemBatch>,
) -> Result<Json<AddItemsOutcome>, AppError> {
    let id = parse_id(&id)?;
    let outcome = state.with_store(|store| store.add_items(id, batch))?;
    Ok(Json(outcome))
}

/// GET /versions/:list_id
async fn list_versions(
    State(state): State<AppState>,
    Path(list_id): Path<String>,
) -> Result<Json<Vec<ListVersion>>, AppError> {
    let id = parse_id(&list_id)?;
    Ok(Json(state.with_store(|store| store.versions(id))?))
}

/// POST /versions
async fn record_version(
    State(state): State<AppState>,
    Json(version): Json<NewVersion>,
) -> Result<(StatusCode, Json<ListVersion>), AppError> {
    let created = state.with_store(|store| store.record_version(version))?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /worklogs/:list_id
async fn list_work_logs(
    State(state): State<AppState>,
    Path(list_id): Path<String>,
) -> Result<Json<Vec<WorkLog>>, AppError> {
    let id = parse_id(&list_id)?;
    Ok(Json(state.with_store(|store| store.work_logs(id))?))
}

/// POST /worklogs
async fn add_work_log(
    State(state): State<AppState>,
    Json(entry): Json<NewWorkLog>,
) -> Result<(StatusCode, Json<WorkLog>), AppError> {
    let created = state.with_store(|store| store.add_work_log(entry))?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// POST /reset - discard everything and reload the sample dataset
async fn reset(State(state): State<AppState>) -> Result<Json<Vec<ListSummary>>, AppError> {
    let lists = state.with_store(|store| store.reset_to_default())?;
    Ok(Json(lists.iter().map(ListSummary::from).collect()))
}

/// POST /query
///
/// The titles of the lists in the requested domain are handed to the
/// provider as context. The store lock is released before the provider is
/// called.
async fn query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryAnswer>, AppError> {
    let domain = request.domain;
    let titles: Vec<String> = state
        .with_store(|store| store.list(domain))?
        .into_iter()
        .map(|l| l.purpose)
        .collect();
    let answer = state.relay.ask(request.with_context(titles)).await?;
    Ok(Json(answer))
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/health", get(health_check))
        .route("/domains", get(list_domains))
        .route("/lists", get(list_lists).post(create_list))
        .route("/lists/:id", get(get_list).put(update_list).delete(delete_list))
        .route("/lists/:id/items", post(add_items))
        .route("/versions", post(record_version))
        .route("/versions/:list_id", get(list_versions))
        .route("/worklogs", post(add_work_log))
        .route("/worklogs/:list_id", get(list_work_logs))
        .route("/reset", post(reset))
        .route("/query", post(query))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use pharmalist_llm::MockProvider;
    use pharmalist_store::MemoryStore;
    use tower::ServiceExt; // for oneshot

    fn create_test_state() -> AppState {
        AppState::new(MemoryStore::seeded(), QueryRelay::new(MockProvider::new("ok")))
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = create_router(create_test_state());

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_malformed_id_is_bad_request() {
        let app = create_router(create_test_state());

        let request = Request::builder()
            .uri("/lists/not-a-uuid")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (AppError::from(StoreError::NotFound("x".into())), StatusCode::NOT_FOUND),
            (AppError::from(StoreError::Validation("x".into())), StatusCode::BAD_REQUEST),
            (AppError::from(StoreError::InvalidData("x".into())), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::from(LlmError::Other("x".into())), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }
}
