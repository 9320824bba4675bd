//! Query relay with a local fallback answer

use crate::{AnswerProvider, LlmError, QueryAnswer, QueryRequest};
use std::sync::Arc;
use tracing::{debug, warn};

/// Answer given when the provider cannot be reached
pub const FALLBACK_ANSWER: &str = "Error: could not reach server.";

/// Relays questions to an [`AnswerProvider`]
///
/// Transport failures (connection errors, timeouts) are replaced by
/// [`FALLBACK_ANSWER`] with no sources. Any other provider error is returned.
#[derive(Clone)]
pub struct QueryRelay {
    provider: Arc<dyn AnswerProvider>,
}

impl QueryRelay {
    /// Wrap a provider
    pub fn new(provider: impl AnswerProvider + 'static) -> Self {
        Self {
            provider: Arc::new(provider),
        }
    }

    /// Wrap an already shared provider
    pub fn from_shared(provider: Arc<dyn AnswerProvider>) -> Self {
        Self { provider }
    }

    /// Ask a question
    ///
    /// # Errors
    /// Returns error only for non-transport provider failures
    pub async fn ask(&self, request: QueryRequest) -> Result<QueryAnswer, LlmError> {
        debug!(domain = ?request.domain, history = request.history.len(), "relaying question");
        match self.provider.answer(&request).await {
            Ok(answer) => Ok(answer),
            Err(e) if e.is_transport() => {
                warn!(error = %e, "answer provider unreachable, using fallback answer");
                Ok(QueryAnswer {
                    answer: FALLBACK_ANSWER.to_string(),
                    sources: Vec::new(),
                })
            }
            Err(e) => Err(e),
        }
    }
}

impl std::fmt::Debug for QueryRelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryRelay").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockProvider;

    #[tokio::test]
    async fn test_relay_passes_answers_through() {
        let relay = QueryRelay::new(MockProvider::new("Three lists"));
        let answer = relay.ask(QueryRequest::new("How many?")).await.unwrap();
        assert_eq!(answer.answer, "Three lists");
    }

    #[tokio::test]
    async fn test_transport_failure_becomes_fallback() {
        let mut provider = MockProvider::default();
        provider.add_transport_error("offline?");
        let relay = QueryRelay::new(provider.clone());

        let answer = relay
            .ask(QueryRequest::new("offline?").with_context(vec!["A".to_string()]))
            .await
            .unwrap();
        assert_eq!(answer.answer, FALLBACK_ANSWER);
        assert!(answer.sources.is_empty());
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_provider_errors_propagate() {
        let mut provider = MockProvider::default();
        provider.add_error("bad");
        let relay = QueryRelay::new(provider);
        assert!(relay.ask(QueryRequest::new("bad")).await.is_err());
    }
}
