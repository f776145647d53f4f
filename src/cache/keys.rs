//! Deterministic cache key construction
//!
//! Keys are sha256 hex digests of their components, so the same request
//! always maps to the same key across processes and restarts. Scopes keep
//! unrelated cached artifacts (schema snapshots, generated queries, insight
//! summaries) from colliding.

use sha2::{Digest, Sha256};
use std::fmt;

/// Purpose of a cached artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyScope {
    /// Database schema snapshot
    Schema,

    /// Precomputed insight summary
    Insights,

    /// Generated query for a natural-language request
    GeneratedQuery,

    /// Caller-defined scope
    Custom(String),
}

impl fmt::Display for KeyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyScope::Schema => write!(f, "schema"),
            KeyScope::Insights => write!(f, "insights"),
            KeyScope::GeneratedQuery => write!(f, "generated_query"),
            KeyScope::Custom(s) => write!(f, "custom:{}", s),
        }
    }
}

/// Builder for scoped cache keys.
pub struct CacheKeyBuilder {
    scope: KeyScope,
    parts: Vec<String>,
}

impl CacheKeyBuilder {
    /// Create a new key builder for the given scope.
    pub fn new(scope: KeyScope) -> Self {
        Self {
            scope,
            parts: Vec::new(),
        }
    }

    /// Append a component to the key.
    pub fn part(mut self, part: impl Into<String>) -> Self {
        self.parts.push(part.into());
        self
    }

    /// Build the final key: `<scope>:<sha256 of joined parts>`.
    pub fn build(self) -> String {
        let joined = self.parts.join("|");
        let digest = Sha256::digest(joined.as_bytes());
        format!("{}:{:x}", self.scope, digest)
    }
}

/// Key for a database-scoped artifact such as a schema snapshot.
pub fn database_key(scope: KeyScope, uri: &str, database: &str) -> String {
    CacheKeyBuilder::new(scope).part(uri).part(database).build()
}

/// Key fingerprinting a generation request by its user input and the
/// context it was generated against.
pub fn request_key(user_input: &str, context: Option<&str>) -> String {
    CacheKeyBuilder::new(KeyScope::GeneratedQuery)
        .part(user_input)
        .part(context.unwrap_or(""))
        .build()
}
