use thiserror::Error;

/// Errors surfaced by the external model capability (embeddings and
/// generation). The retry policy uses `is_retryable` to decide whether a
/// failed call should back off and try again or fail fast.
#[derive(Error, Debug)]
pub enum ModelError {
    /// Usage limits for the billing period are exhausted. Never retried;
    /// the orchestrator switches the rest of the run to degraded mode.
    #[error("quota exhausted: {0}")]
    QuotaExceeded(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("model not found: {0}")]
    NotFound(String),

    #[error("empty model response")]
    EmptyResponse,

    #[error("malformed model output: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service error ({status}): {message}")]
    Service { status: u16, message: String },
}

impl ModelError {
    /// Transient failures (timeouts, 5xx, rate limits within the minute,
    /// garbled output) are worth another attempt. Auth, bad-request,
    /// not-found and quota exhaustion are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            ModelError::QuotaExceeded(_)
            | ModelError::Auth(_)
            | ModelError::InvalidRequest(_)
            | ModelError::NotFound(_) => false,
            ModelError::EmptyResponse
            | ModelError::Malformed(_)
            | ModelError::Http(_)
            | ModelError::Service { .. } => true,
        }
    }
}

pub type ModelResult<T> = std::result::Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_is_not_retryable() {
        assert!(!ModelError::QuotaExceeded("daily limit".to_string()).is_retryable());
    }

    #[test]
    fn test_auth_is_not_retryable() {
        assert!(!ModelError::Auth("401".to_string()).is_retryable());
        assert!(!ModelError::InvalidRequest("400".to_string()).is_retryable());
        assert!(!ModelError::NotFound("404".to_string()).is_retryable());
    }

    #[test]
    fn test_service_errors_are_retryable() {
        let err = ModelError::Service {
            status: 503,
            message: "overloaded".to_string(),
        };
        assert!(err.is_retryable());
        assert!(ModelError::EmptyResponse.is_retryable());
    }
}
