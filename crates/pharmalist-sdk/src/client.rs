//! HTTP client for the Pharmalist server.

use crate::error::SdkError;
use crate::ListService;
use async_trait::async_trait;
use pharmalist_domain::{
    AddItemsOutcome, DeleteResponse, DomainKey, ItemBatch, ListDetail, ListId, ListSummary,
    ListUpdate, ListVersion, NewList, NewVersion, NewWorkLog, WorkLog,
};
use pharmalist_llm::{AnswerProvider, LlmError, QueryAnswer, QueryRelay, QueryRequest};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

/// Request timeout; expiry surfaces as [`SdkError::Timeout`]
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Response of `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    /// Overall health status
    pub status: String,
    /// Number of stored lists
    pub list_count: usize,
}

/// Pharmalist HTTP client
///
/// Cheap to clone; clones share the connection pool. Every request carries
/// the configured timeout and, if set, a bearer token.
#[derive(Debug, Clone)]
pub struct PharmaClient {
    base_url: String,
    http: reqwest::Client,
    token: Option<String>,
}

impl PharmaClient {
    /// Create a client with the default timeout
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built
    pub fn new(base_url: impl Into<String>) -> Result<Self, SdkError> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client with a custom request timeout
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SdkError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SdkError::ConnectionError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            token: None,
        })
    }

    /// Attach a bearer token to every request
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Server base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check that the server is up
    pub async fn health(&self) -> Result<HealthStatus, SdkError> {
        self.send(self.request(Method::GET, "/health")).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn with_body<B: Serialize + ?Sized>(&self, method: Method, path: &str, body: &B) -> RequestBuilder {
        self.request(method, path).json(body)
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, SdkError> {
        let response = builder.send().await.map_err(|e| {
            let err = SdkError::from(e);
            error!(error = %err, "request failed");
            err
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let err = SdkError::from_status(status.as_u16(), &error_text);
            error!(status = status.as_u16(), error = %err, "request rejected");
            return Err(err);
        }

        debug!(status = status.as_u16(), url = %response.url(), "request succeeded");
        Ok(response.json().await?)
    }

    async fn post_query(&self, request: &QueryRequest) -> Result<QueryAnswer, SdkError> {
        self.send(self.with_body(Method::POST, "/query", request)).await
    }
}

#[async_trait]
impl ListService for PharmaClient {
    async fn list(&self, domain: Option<DomainKey>) -> Result<Vec<ListSummary>, SdkError> {
        let path = match domain {
            Some(domain) => format!("/lists?category={}", domain.as_str()),
            None => "/lists".to_string(),
        };
        self.send(self.request(Method::GET, &path)).await
    }

    async fn get(&self, id: ListId) -> Result<ListDetail, SdkError> {
        self.send(self.request(Method::GET, &format!("/lists/{}", id))).await
    }

    async fn create(&self, new_list: NewList) -> Result<ListSummary, SdkError> {
        self.send(self.with_body(Method::POST, "/lists", &new_list)).await
    }

    async fn update(&self, id: ListId, update: ListUpdate) -> Result<ListSummary, SdkError> {
        self.send(self.with_body(Method::PUT, &format!("/lists/{}", id), &update))
            .await
    }

    async fn add_items(&self, id: ListId, batch: ItemBatch) -> Result<AddItemsOutcome, SdkError> {
        self.send(self.with_body(Method::POST, &format!("/lists/{}/items", id), &batch))
            .await
    }

    async fn delete(&self, id: ListId) -> Result<bool, SdkError> {
        let response: DeleteResponse = self
            .send(self.request(Method::DELETE, &format!("/lists/{}", id)))
            .await?;
        Ok(response.success)
    }

    async fn versions(&self, id: ListId) -> Result<Vec<ListVersion>, SdkError> {
        self.send(self.request(Method::GET, &format!("/versions/{}", id)))
            .await
    }

    async fn record_version(&self, version: NewVersion) -> Result<ListVersion, SdkError> {
        self.send(self.with_body(Method::POST, "/versions", &version)).await
    }

    async fn work_logs(&self, id: ListId) -> Result<Vec<WorkLog>, SdkError> {
        self.send(self.request(Method::GET, &format!("/worklogs/{}", id)))
            .await
    }

    async fn add_work_log(&self, entry: NewWorkLog) -> Result<WorkLog, SdkError> {
        self.send(self.with_body(Method::POST, "/worklogs", &entry)).await
    }

    async fn reset(&self) -> Result<Vec<ListSummary>, SdkError> {
        self.send(self.request(Method::POST, "/reset")).await
    }

    async fn ask(&self, request: QueryRequest) -> Result<QueryAnswer, SdkError> {
        // An unreachable server is answered locally like any other provider
        let relay = QueryRelay::new(self.clone());
        Ok(relay.ask(request).await?)
    }
}

#[async_trait]
impl AnswerProvider for PharmaClient {
    async fn answer(&self, request: &QueryRequest) -> Result<QueryAnswer, LlmError> {
        self.post_query(request).await.map_err(|e| match e {
            SdkError::Timeout => LlmError::Timeout,
            SdkError::ConnectionError(msg) => LlmError::Communication(msg),
            SdkError::Decode(msg) => LlmError::InvalidResponse(msg),
            other => LlmError::Other(other.to_string()),
        })
    }
}
