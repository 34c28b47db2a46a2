//! Error taxonomy for the assessment engine.
//!
//! `JudgeError` represents failures at the external judge boundary. It is
//! defined in `examforge-core` so the orchestrator can downcast and classify
//! errors for retry decisions without string matching.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when calling an external feature judge.
#[derive(Debug, Error)]
pub enum JudgeError {
    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested model was not found.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The judge replied, but not with a parseable verdict.
    #[error("malformed verdict: {0}")]
    MalformedVerdict(String),
}

impl JudgeError {
    /// Returns `true` if this error is permanent and should not be retried.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            JudgeError::AuthenticationFailed(_) | JudgeError::ModelNotFound(_)
        )
    }

    /// Returns the retry-after delay in milliseconds, if applicable.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            JudgeError::RateLimited { retry_after_ms } => Some(*retry_after_ms),
            _ => None,
        }
    }
}

/// Errors raised while loading exam documents during the barrier phase.
/// These are fatal to the run; nothing has been assessed yet.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A required source document is missing.
    #[error("input not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    /// A source document exists but could not be parsed.
    #[error("malformed document {}: {message}", path.display())]
    Malformed { path: PathBuf, message: String },
}

/// Failure to resolve a student identity against the roster.
#[derive(Debug, Error)]
pub enum MatchError {
    /// No roster entry satisfied the matching policy.
    #[error("student not found: '{query}' (nearby: {})", candidates.join(", "))]
    NotFound {
        query: String,
        candidates: Vec<String>,
    },

    /// A prefix query matched more than one roster entry.
    #[error("ambiguous student query '{query}' matches: {}", candidates.join(", "))]
    Ambiguous {
        query: String,
        candidates: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permanent_errors_are_not_retried() {
        assert!(JudgeError::AuthenticationFailed("bad key".into()).is_permanent());
        assert!(JudgeError::ModelNotFound("nope".into()).is_permanent());
        assert!(!JudgeError::NetworkError("reset".into()).is_permanent());
        assert!(!JudgeError::RateLimited { retry_after_ms: 100 }.is_permanent());
    }

    #[test]
    fn rate_limit_carries_retry_hint() {
        let err = JudgeError::RateLimited { retry_after_ms: 5000 };
        assert_eq!(err.retry_after_ms(), Some(5000));
        assert_eq!(JudgeError::Timeout(30).retry_after_ms(), None);
    }
}
