//! Error types for the Pharmalist SDK.

use pharmalist_llm::LlmError;
use pharmalist_store::StoreError;
use serde::Deserialize;
use thiserror::Error;

/// SDK operation errors
#[derive(Debug, Error)]
pub enum SdkError {
    /// Input rejected by the server or store
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unknown list
    #[error("Not found: {0}")]
    NotFound(String),

    /// Connection error (network, DNS, etc.)
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The server did not answer in time
    #[error("Request timed out")]
    Timeout,

    /// Any other non-success response
    #[error("Server error (HTTP {status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Error text from the response body
        message: String,
    },

    /// Response body could not be decoded
    #[error("Invalid response: {0}")]
    Decode(String),

    /// Local store failure other than validation or not-found
    #[error("Storage error: {0}")]
    Storage(String),

    /// Answer provider failure that the relay did not absorb
    #[error("Answer error: {0}")]
    Answer(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl SdkError {
    /// Build an error from a non-success status and its response body
    ///
    /// The body's `error` field is used when it is the server's JSON error
    /// shape; otherwise the raw text is kept.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .map(|b| b.error)
            .unwrap_or_else(|_| body.to_string());
        match status {
            400 => SdkError::Validation(message),
            404 => SdkError::NotFound(message),
            _ => SdkError::Server { status, message },
        }
    }

    /// Whether the request never got an answer (connection failure or timeout)
    pub fn is_transport(&self) -> bool {
        matches!(self, SdkError::ConnectionError(_) | SdkError::Timeout)
    }

    /// Whether the error reports an unknown list
    pub fn is_not_found(&self) -> bool {
        matches!(self, SdkError::NotFound(_))
    }
}

impl From<reqwest::Error> for SdkError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SdkError::Timeout
        } else if e.is_connect() {
            SdkError::ConnectionError(e.to_string())
        } else if e.is_decode() {
            SdkError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            SdkError::Server {
                status: status.as_u16(),
                message: e.to_string(),
            }
        } else {
            SdkError::ConnectionError(e.to_string())
        }
    }
}

impl From<StoreError> for SdkError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(msg) => SdkError::NotFound(msg),
            StoreError::Validation(msg) => SdkError::Validation(msg),
            other => SdkError::Storage(other.to_string()),
        }
    }
}

impl From<LlmError> for SdkError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::Communication(msg) => SdkError::ConnectionError(msg),
            LlmError::Timeout => SdkError::Timeout,
            other => SdkError::Answer(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(e: serde_json::Error) -> Self {
        SdkError::Decode(format!("JSON parsing error: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping_uses_error_body() {
        let err = SdkError::from_status(400, r#"{"error":"Validation error: Purpose is required"}"#);
        assert!(matches!(err, SdkError::Validation(ref m) if m.contains("Purpose is required")));

        let err = SdkError::from_status(404, r#"{"error":"List not found: x"}"#);
        assert!(err.is_not_found());

        let err = SdkError::from_status(502, "Bad Gateway");
        assert!(matches!(err, SdkError::Server { status: 502, ref message } if message == "Bad Gateway"));
    }

    #[test]
    fn test_store_errors_keep_their_kind() {
        assert!(SdkError::from(StoreError::NotFound("x".into())).is_not_found());
        assert!(matches!(
            SdkError::from(StoreError::Validation("x".into())),
            SdkError::Validation(_)
        ));
        assert!(matches!(
            SdkError::from(StoreError::InvalidData("x".into())),
            SdkError::Storage(_)
        ));
    }

    #[test]
    fn test_transport_classification() {
        assert!(SdkError::Timeout.is_transport());
        assert!(SdkError::from(LlmError::Communication("down".into())).is_transport());
        assert!(!SdkError::Validation("x".into()).is_transport());
    }
}
