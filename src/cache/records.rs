//! Typed wrappers for cached assistant artifacts

use crate::provider::TokenUsage;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A generated query cached against its originating request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedQuery {
    /// The generated query text
    pub query: String,

    /// Model that produced it, if reported
    pub model_name: Option<String>,

    /// Token accounting for the generation, if reported
    pub token_usage: Option<TokenUsage>,
}

impl CachedQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            model_name: None,
            token_usage: None,
        }
    }

    pub fn with_model(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = Some(model_name.into());
        self
    }

    /// Serialize into an opaque cache payload.
    pub fn to_value(&self) -> Option<Value> {
        serde_json::to_value(self).ok()
    }

    /// Deserialize from a cache payload; `None` when the payload does not
    /// hold a cached query.
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }
}
