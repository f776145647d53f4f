//! # Graphwise
//!
//! Resilient LLM request orchestration for a graph query assistant.
//!
//! The crate sits between an assistant and its remote text-generation API
//! and makes that relationship survivable: results are cached across runs,
//! transient failures are retried with backoff, and prompts are kept inside
//! the model's context window.
//!
//! ## Features
//!
//! - Persisted query cache with age-based expiry and an LRU size bound
//! - Atomic cache persistence (temp-file-then-rename, never half-written)
//! - Failure classification into a structured error taxonomy
//! - Bounded retries with exponential backoff honoring server delay hints
//! - Token-budgeted prompt assembly with priority-ordered truncation
//! - Async-first design using tokio
//!
//! ## Caching
//!
//! ```no_run
//! use graphwise::{CacheConfig, QueryCache};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() {
//!     let cache = QueryCache::open(CacheConfig::default()).await;
//!
//!     let key = graphwise::cache::request_key("who knows Alice?", None);
//!     if cache.get(&key).await.is_none() {
//!         // ... compute the expensive result ...
//!         cache.put(&key, json!({"query": "MATCH (p)-[:KNOWS]->(a {name: 'Alice'}) RETURN p"}))
//!             .await;
//!     }
//!
//!     cache.save_if_dirty().await;
//! }
//! ```
//!
//! ## Retrying Remote Calls
//!
//! ```no_run
//! use graphwise::{ProviderError, RequestExecutor, RetryPolicy};
//!
//! #[tokio::main]
//! async fn main() -> graphwise::Result<()> {
//!     let executor = RequestExecutor::new(RetryPolicy::default());
//!
//!     let answer = executor
//!         .execute(|| async {
//!             // one remote call per invocation
//!             Ok::<_, ProviderError>("MATCH (n) RETURN n LIMIT 25".to_string())
//!         })
//!         .await?;
//!
//!     println!("{answer}");
//!     Ok(())
//! }
//! ```
//!
//! ## Budgeting Prompts
//!
//! ```no_run
//! use graphwise::{BudgetConfig, ContextBudgeter, LlmProvider};
//! use std::sync::Arc;
//!
//! async fn build_prompt(provider: Arc<dyn LlmProvider>) -> graphwise::Result<String> {
//!     let budgeter = ContextBudgeter::new(provider, BudgetConfig::default())?;
//!
//!     let prompt = budgeter
//!         .prepare_prompt(
//!             "who knows Alice?",
//!             "Translate the user's question into a Cypher query.",
//!             Some("(:Person)-[:KNOWS]->(:Person)"),
//!             None,
//!         )
//!         .await;
//!
//!     Ok(prompt)
//! }
//! ```

pub mod cache;
pub mod context;
pub mod error;
pub mod provider;
pub mod retry;

// Re-export main types for convenience
pub use cache::{
    CacheConfig, CacheConfigBuilder, CacheEntry, CacheKeyBuilder, CacheStats, CachedQuery,
    EntryInfo, KeyScope, QueryCache,
};
pub use context::{BudgetConfig, ContextBudgeter, TRUNCATION_MARKER};
pub use error::{LlmError, ProviderError, Result};
pub use provider::{ChatMessage, LlmProvider, LlmResponse, Role, TokenUsage};
pub use retry::{classify, RequestExecutor, RetryPolicy};
