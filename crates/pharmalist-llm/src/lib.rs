//! Pharmalist Answer Providers
//!
//! Conversational questions about lists are answered by an opaque
//! [`AnswerProvider`]. The [`QueryRelay`] wraps a provider and turns transport
//! failures into a fixed fallback answer so a chat never breaks on a flaky
//! network.
//!
//! # Providers
//!
//! - `MockProvider`: deterministic mock for testing
//! - `EchoProvider`: echoes the question, used when nothing is configured
//! - `OllamaProvider`: local Ollama API integration
//!
//! # Examples
//!
//! ```
//! use pharmalist_llm::{MockProvider, QueryRelay, QueryRequest};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let relay = QueryRelay::new(MockProvider::new("Three lists"));
//! let answer = relay.ask(QueryRequest::new("How many lists?")).await.unwrap();
//! assert_eq!(answer.answer, "Three lists");
//! # }
//! ```

#![warn(missing_docs)]

pub mod mock;
pub mod ollama;
pub mod relay;

pub use mock::{EchoProvider, MockProvider};
pub use ollama::OllamaProvider;
pub use relay::{QueryRelay, FALLBACK_ANSWER};

use async_trait::async_trait;
use pharmalist_domain::DomainKey;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while producing an answer
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// The provider did not answer in time
    #[error("Request timed out")]
    Timeout,

    /// Invalid response from the provider
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

impl LlmError {
    /// Whether the error came from the network rather than the provider itself
    pub fn is_transport(&self) -> bool {
        matches!(self, LlmError::Communication(_) | LlmError::Timeout)
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Timeout
        } else if e.is_decode() {
            LlmError::InvalidResponse(e.to_string())
        } else {
            LlmError::Communication(e.to_string())
        }
    }
}

/// Speaker of one chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// The person asking
    User,
    /// The answering side
    Assistant,
}

/// One earlier message of the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Who said it
    pub role: ChatRole,
    /// What was said
    pub content: String,
}

impl ChatTurn {
    /// A user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// An assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// A question about the lists, with optional scope and conversation history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The question
    pub question: String,

    /// Domain the question is scoped to
    #[serde(default)]
    pub domain: Option<DomainKey>,

    /// Earlier turns, oldest first
    #[serde(default)]
    pub history: Vec<ChatTurn>,

    /// List titles the answer may draw on; filled in by the server
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context: Vec<String>,
}

impl QueryRequest {
    /// A bare question with no scope or history
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            domain: None,
            history: Vec::new(),
            context: Vec::new(),
        }
    }

    /// Scope the question to a domain
    pub fn in_domain(mut self, domain: DomainKey) -> Self {
        self.domain = Some(domain);
        self
    }

    /// Attach earlier turns
    pub fn with_history(mut self, history: Vec<ChatTurn>) -> Self {
        self.history = history;
        self
    }

    /// Attach context the provider may cite
    pub fn with_context(mut self, context: Vec<String>) -> Self {
        self.context = context;
        self
    }
}

/// Answer to a [`QueryRequest`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryAnswer {
    /// Answer text
    pub answer: String,

    /// What the answer was drawn from
    #[serde(default)]
    pub sources: Vec<String>,
}

/// Anything that can answer a question about the lists
#[async_trait]
pub trait AnswerProvider: Send + Sync {
    /// Produce an answer
    async fn answer(&self, request: &QueryRequest) -> Result<QueryAnswer, LlmError>;
}

#[async_trait]
impl<P: AnswerProvider + ?Sized> AnswerProvider for std::sync::Arc<P> {
    async fn answer(&self, request: &QueryRequest) -> Result<QueryAnswer, LlmError> {
        (**self).answer(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_shape() {
        let request: QueryRequest =
            serde_json::from_str(r#"{"question":"Who added items?","domain":"Customer"}"#).unwrap();
        assert_eq!(request.domain, Some(DomainKey::Customer));
        assert!(request.history.is_empty());

        let json = serde_json::to_value(QueryRequest::new("q")).unwrap();
        assert!(json.get("context").is_none());
    }

    #[test]
    fn test_history_roles_are_lowercase() {
        let json = serde_json::to_string(&ChatTurn::assistant("hi")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
    }

    #[test]
    fn test_transport_classification() {
        assert!(LlmError::Timeout.is_transport());
        assert!(LlmError::Communication("refused".into()).is_transport());
        assert!(!LlmError::ModelNotAvailable("x".into()).is_transport());
    }
}
