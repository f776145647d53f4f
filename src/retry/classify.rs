//! Failure classification for remote API errors
//!
//! Structured status codes are inspected first. When a provider surfaces
//! only a message, classification falls back to substring matching, which is
//! best-effort by design: it exists for providers without structured error
//! types and makes no exactness guarantees.

use crate::error::{LlmError, ProviderError};
use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;

const RATE_LIMIT_PATTERNS: &[&str] = &["quota", "rate limit", "resource exhausted"];
const SERVER_ERROR_PATTERNS: &[&str] = &["internal error", "unavailable"];
const TIMEOUT_PATTERNS: &[&str] = &["timeout", "timed out", "cancelled", "deadline exceeded"];

/// Classify a raw provider failure into the error taxonomy.
pub fn classify(error: ProviderError) -> LlmError {
    if let Some(status) = error.status() {
        return classify_status(status, error);
    }

    classify_message(error)
}

fn classify_status(status: u16, error: ProviderError) -> LlmError {
    let message = error.message().to_lowercase();

    match status {
        429 => LlmError::RateLimit {
            retry_after: extract_retry_after(&message),
            source: error,
        },
        500 | 502 | 503 => LlmError::ServerError { source: error },
        504 => LlmError::Timeout { source: error },
        400 if mentions_api_key(&message) => LlmError::Authentication { source: error },
        404 => LlmError::ModelNotFound { source: error },
        _ => classify_message(error),
    }
}

/// Substring fallback for providers that only surface a message. Mirrors the
/// status-based table, looking for embedded status codes first and known
/// phrasing second.
fn classify_message(error: ProviderError) -> LlmError {
    let message = error.message().to_lowercase();

    if message.contains("429") || RATE_LIMIT_PATTERNS.iter().any(|p| message.contains(p)) {
        return LlmError::RateLimit {
            retry_after: extract_retry_after(&message),
            source: error,
        };
    }

    if message.contains("400") && mentions_api_key(&message) {
        return LlmError::Authentication { source: error };
    }

    if message.contains("404") || message.contains("not found") {
        return LlmError::ModelNotFound { source: error };
    }

    if ["500", "502", "503"].iter().any(|c| message.contains(c))
        || SERVER_ERROR_PATTERNS.iter().any(|p| message.contains(p))
    {
        return LlmError::ServerError { source: error };
    }

    if message.contains("504") || TIMEOUT_PATTERNS.iter().any(|p| message.contains(p)) {
        return LlmError::Timeout { source: error };
    }

    LlmError::Other { source: error }
}

fn mentions_api_key(message: &str) -> bool {
    message.contains("api key") || message.contains("api_key")
}

/// Parse a server-supplied `retry in Ns` hint out of an error message.
fn extract_retry_after(message: &str) -> Option<Duration> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"retry[^\d]*(\d+(?:\.\d+)?)\s*s").expect("valid retry-after pattern")
    });

    let captures = re.captures(message)?;
    let seconds: f64 = captures.get(1)?.as_str().parse().ok()?;
    Some(Duration::from_secs_f64(seconds))
}
