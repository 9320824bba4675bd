//! Deterministic providers for tests and unconfigured deployments

use crate::{AnswerProvider, LlmError, QueryAnswer, QueryRequest};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone)]
enum Scripted {
    Answer(String),
    Fail(fn() -> LlmError),
}

#[derive(Debug, Default)]
struct MockState {
    scripted: HashMap<String, Scripted>,
    calls: Vec<QueryRequest>,
}

/// Mock answer provider for deterministic testing
///
/// Returns pre-configured answers without making any network calls. The
/// request context is passed through as the answer's sources. Clones share
/// their script and call record.
///
/// # Examples
///
/// ```
/// use pharmalist_llm::{AnswerProvider, MockProvider, QueryRequest};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mut provider = MockProvider::new("Fixed answer");
/// provider.add_answer("Which lists?", "Two lists");
///
/// let answer = provider.answer(&QueryRequest::new("Which lists?")).await.unwrap();
/// assert_eq!(answer.answer, "Two lists");
/// assert_eq!(provider.call_count(), 1);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_answer: String,
    state: Arc<Mutex<MockState>>,
}

impl MockProvider {
    /// Create a provider with a fixed answer for all questions
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            default_answer: answer.into(),
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    // A poisoned lock only means another test thread panicked mid-call
    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Answer a specific question with a specific text
    pub fn add_answer(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.state()
            .scripted
            .insert(question.into(), Scripted::Answer(answer.into()));
    }

    /// Fail a specific question with a transport error
    pub fn add_transport_error(&mut self, question: impl Into<String>) {
        self.state().scripted.insert(
            question.into(),
            Scripted::Fail(|| LlmError::Communication("connection refused".to_string())),
        );
    }

    /// Fail a specific question with a provider error
    pub fn add_error(&mut self, question: impl Into<String>) {
        self.state().scripted.insert(
            question.into(),
            Scripted::Fail(|| LlmError::Other("Mock error".to_string())),
        );
    }

    /// Number of questions answered or failed so far
    pub fn call_count(&self) -> usize {
        self.state().calls.len()
    }

    /// Most recent request, if any
    pub fn last_request(&self) -> Option<QueryRequest> {
        self.state().calls.last().cloned()
    }

    /// Forget recorded calls
    pub fn reset_call_count(&self) {
        self.state().calls.clear();
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock answer")
    }
}

#[async_trait]
impl AnswerProvider for MockProvider {
    async fn answer(&self, request: &QueryRequest) -> Result<QueryAnswer, LlmError> {
        let mut state = self.state();
        state.calls.push(request.clone());

        let answer = match state.scripted.get(&request.question) {
            Some(Scripted::Fail(make)) => return Err(make()),
            Some(Scripted::Answer(answer)) => answer.clone(),
            None => self.default_answer.clone(),
        };
        Ok(QueryAnswer {
            answer,
            sources: request.context.clone(),
        })
    }
}

/// Provider that echoes the question back
///
/// Stands in when no model is configured so `/query` still answers.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoProvider;

#[async_trait]
impl AnswerProvider for EchoProvider {
    async fn answer(&self, request: &QueryRequest) -> Result<QueryAnswer, LlmError> {
        Ok(QueryAnswer {
            answer: format!("Mock answer for: {}", request.question),
            sources: request.context.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_provider_default() {
        let provider = MockProvider::new("Test answer");
        let answer = provider.answer(&QueryRequest::new("anything")).await.unwrap();
        assert_eq!(answer.answer, "Test answer");
        assert!(answer.sources.is_empty());
    }

    #[tokio::test]
    async fn test_mock_provider_scripted_answers() {
        let mut provider = MockProvider::default();
        provider.add_answer("hello", "world");

        assert_eq!(provider.answer(&QueryRequest::new("hello")).await.unwrap().answer, "world");
        assert_eq!(
            provider.answer(&QueryRequest::new("unknown")).await.unwrap().answer,
            "Default mock answer"
        );
    }

    #[tokio::test]
    async fn test_mock_provider_records_calls() {
        let provider = MockProvider::new("ok");
        let request = QueryRequest::new("q").with_context(vec!["Q3 Targets".to_string()]);

        let answer = provider.answer(&request).await.unwrap();
        assert_eq!(answer.sources, vec!["Q3 Targets"]);
        assert_eq!(provider.call_count(), 1);
        assert_eq!(provider.last_request(), Some(request));

        provider.reset_call_count();
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_provider_errors() {
        let mut provider = MockProvider::default();
        provider.add_error("bad");
        provider.add_transport_error("offline");

        let err = provider.answer(&QueryRequest::new("bad")).await.unwrap_err();
        assert!(matches!(err, LlmError::Other(_)));
        let err = provider.answer(&QueryRequest::new("offline")).await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_mock_provider_clone_shares_state() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.answer(&QueryRequest::new("q")).await.unwrap();
        assert_eq!(provider2.call_count(), 1);
    }

    #[tokio::test]
    async fn test_echo_provider() {
        let answer = EchoProvider.answer(&QueryRequest::new("How many?")).await.unwrap();
        assert_eq!(answer.answer, "Mock answer for: How many?");
    }
}
