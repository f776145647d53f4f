//! Error types for LLM request orchestration
//!
//! This module defines the classified error taxonomy surfaced by the
//! request executor, plus the raw provider-level failure it is derived from.

use std::time::Duration;
use thiserror::Error;

/// Raw, unclassified failure reported by an LLM provider.
///
/// Providers that expose structured HTTP errors should use `Http` so that
/// classification can inspect the status code directly. Providers that only
/// surface a message use `Other`, and classification falls back to
/// best-effort substring matching.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// HTTP-level failure with a structured status code
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Opaque failure carrying only a message
    #[error("{0}")]
    Other(String),
}

impl ProviderError {
    /// The status code, when the provider reported one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Http { status, .. } => Some(*status),
            ProviderError::Other(_) => None,
        }
    }

    /// The human-readable message, regardless of variant.
    pub fn message(&self) -> &str {
        match self {
            ProviderError::Http { message, .. } => message,
            ProviderError::Other(message) => message,
        }
    }
}

impl From<String> for ProviderError {
    fn from(s: String) -> Self {
        ProviderError::Other(s)
    }
}

impl From<&str> for ProviderError {
    fn from(s: &str) -> Self {
        ProviderError::Other(s.to_string())
    }
}

/// Classified error surfaced by the request executor.
///
/// `Authentication` and `ModelNotFound` are terminal and never retried;
/// the remaining kinds are retryable up to the configured attempt ceiling.
/// The original provider failure is always preserved as the source.
#[derive(Error, Debug)]
pub enum LlmError {
    /// Rate limit or quota exhaustion, optionally with a server-supplied
    /// delay hint parsed from the error message
    #[error("rate limit exceeded: {source}")]
    RateLimit {
        retry_after: Option<Duration>,
        #[source]
        source: ProviderError,
    },

    /// Invalid or missing API credentials
    #[error("authentication failed: {source}")]
    Authentication {
        #[source]
        source: ProviderError,
    },

    /// The requested model does not exist or is not available
    #[error("model not found: {source}")]
    ModelNotFound {
        #[source]
        source: ProviderError,
    },

    /// Request timed out, was cancelled, or exceeded its deadline
    #[error("request timed out: {source}")]
    Timeout {
        #[source]
        source: ProviderError,
    },

    /// Remote server failure (5xx)
    #[error("server error: {source}")]
    ServerError {
        #[source]
        source: ProviderError,
    },

    /// Anything that matched no other classification
    #[error("llm request failed: {source}")]
    Other {
        #[source]
        source: ProviderError,
    },

    /// Invalid configuration supplied at construction time
    #[error("configuration error: {0}")]
    Config(String),
}

impl LlmError {
    /// Whether the retry loop may attempt this failure again.
    ///
    /// `retry_generic` controls whether unclassified failures are retried.
    pub fn is_retryable(&self, retry_generic: bool) -> bool {
        match self {
            LlmError::RateLimit { .. } | LlmError::ServerError { .. } | LlmError::Timeout { .. } => {
                true
            }
            LlmError::Authentication { .. }
            | LlmError::ModelNotFound { .. }
            | LlmError::Config(_) => false,
            LlmError::Other { .. } => retry_generic,
        }
    }

    /// Server-supplied delay hint, present only for rate-limit failures
    /// whose message carried one.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            LlmError::RateLimit { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

/// Result type alias for orchestration operations
pub type Result<T> = std::result::Result<T, LlmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = LlmError::Authentication {
            source: ProviderError::Http {
                status: 400,
                message: "API key not valid".to_string(),
            },
        };
        assert_eq!(
            error.to_string(),
            "authentication failed: HTTP 400: API key not valid"
        );

        let error = LlmError::RateLimit {
            retry_after: Some(Duration::from_secs(30)),
            source: ProviderError::Other("quota exceeded".to_string()),
        };
        assert!(error.to_string().contains("rate limit exceeded"));
    }

    #[test]
    fn test_retryability() {
        let rate_limit = LlmError::RateLimit {
            retry_after: None,
            source: "quota".into(),
        };
        let auth = LlmError::Authentication {
            source: "bad key".into(),
        };
        let generic = LlmError::Other {
            source: "boom".into(),
        };

        assert!(rate_limit.is_retryable(false));
        assert!(!auth.is_retryable(true));
        assert!(!generic.is_retryable(false));
        assert!(generic.is_retryable(true));
    }

    #[test]
    fn test_provider_error_conversion() {
        let error: ProviderError = "test error".into();
        assert!(matches!(error, ProviderError::Other(_)));
        assert_eq!(error.status(), None);
        assert_eq!(error.message(), "test error");

        let error = ProviderError::Http {
            status: 503,
            message: "unavailable".to_string(),
        };
        assert_eq!(error.status(), Some(503));
    }
}
