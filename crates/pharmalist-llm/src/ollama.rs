//! Ollama Provider Implementation
//!
//! Answers questions with a local model served by Ollama. The prompt carries
//! the domain scope, the titles of the lists in that scope and the earlier
//! turns of the conversation.
//!
//! # Examples
//!
//! ```no_run
//! use pharmalist_llm::OllamaProvider;
//!
//! let provider = OllamaProvider::new("http://localhost:11434", "llama3").unwrap();
//! ```

use crate::{AnswerProvider, ChatRole, LlmError, QueryAnswer, QueryRequest};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::time::Duration;
use tracing::debug;

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Request timeout; expiry surfaces as [`LlmError::Timeout`]
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Ollama API provider for local inference
#[derive(Debug, Clone)]
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    client: reqwest::Client,
}

/// Request body for Ollama generate API
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
}

/// Response from Ollama generate API
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

impl OllamaProvider {
    /// Create a new Ollama provider
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        Self::with_timeout(endpoint, model, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a provider with a custom request timeout
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built
    pub fn with_timeout(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            client,
        })
    }

    /// Create a provider against `http://localhost:11434`
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built
    pub fn default_endpoint(model: impl Into<String>) -> Result<Self, LlmError> {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Model name sent with every request
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Single attempt against `/api/generate`; failures are not retried
    async fn generate(&self, prompt: String) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.endpoint);
        let body = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotAvailable(self.model.clone()));
        }
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Communication(format!("HTTP {}: {}", status, text)));
        }

        let parsed: OllamaGenerateResponse = response.json().await?;
        Ok(parsed.response)
    }
}

/// Render a request as a single prompt
pub(crate) fn build_prompt(request: &QueryRequest) -> String {
    let mut prompt = String::from(
        "You answer questions about pharmaceutical contact lists: who is on them, \
         how they changed between versions and who changed them.\n",
    );
    if let Some(domain) = request.domain {
        let _ = writeln!(prompt, "Domain: {}", domain.config().display_name);
    }
    if !request.context.is_empty() {
        prompt.push_str("Lists:\n");
        for title in &request.context {
            let _ = writeln!(prompt, "- {}", title);
        }
    }
    for turn in &request.history {
        let speaker = match turn.role {
            ChatRole::User => "User",
            ChatRole::Assistant => "Assistant",
        };
        let _ = writeln!(prompt, "{}: {}", speaker, turn.content);
    }
    let _ = write!(prompt, "User: {}\nAssistant:", request.question);
    prompt
}

#[async_trait]
impl AnswerProvider for OllamaProvider {
    async fn answer(&self, request: &QueryRequest) -> Result<QueryAnswer, LlmError> {
        let prompt = build_prompt(request);
        debug!(model = %self.model, prompt_len = prompt.len(), "querying ollama");
        let answer = self.generate(prompt).await?;
        Ok(QueryAnswer {
            answer: answer.trim().to_string(),
            sources: request.context.clone(),
        })
    }
}
