//! Assistant Orchestration Demo
//!
//! Walks the full request path with a scripted in-process provider: budget
//! the prompt, consult the cache, call the provider through the retry
//! executor, and persist the result.
//!
//! Usage:
//!   cargo run --example assistant_demo
//!
//! Environment variables:
//!   GRAPHWISE_CACHE_FILE - cache file path (default: .graphwise_demo_cache.json)

use async_trait::async_trait;
use graphwise::cache::{request_key, CacheConfig, CachedQuery, QueryCache};
use graphwise::{
    BudgetConfig, ChatMessage, ContextBudgeter, LlmProvider, LlmResponse, ProviderError,
    RequestExecutor, RetryPolicy,
};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, Level};

/// Scripted provider: fails twice with a 503, then answers. Stands in for a
/// real API binding so the demo runs offline.
struct ScriptedProvider {
    calls: AtomicU32,
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn generate(&self, _prompt: &str) -> Result<LlmResponse, ProviderError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < 2 {
            return Err(ProviderError::Http {
                status: 503,
                message: "The model is overloaded. Please try again later.".to_string(),
            });
        }
        Ok(LlmResponse::new(
            "MATCH (p:Person)-[:KNOWS]->(a:Person {name: 'Alice'}) RETURN p.name",
        ))
    }

    async fn count_tokens(&self, text: &str) -> Result<usize, ProviderError> {
        Ok(text.chars().count() / 4)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("=== Assistant Orchestration Demo ===");

    let cache_file = std::env::var("GRAPHWISE_CACHE_FILE")
        .unwrap_or_else(|_| ".graphwise_demo_cache.json".to_string());

    let cache = QueryCache::open(
        CacheConfig::builder()
            .cache_file(&cache_file)
            .max_age(Duration::from_secs(24 * 3600))
            .max_entries(100)
            .build(),
    )
    .await;

    let provider = Arc::new(ScriptedProvider {
        calls: AtomicU32::new(0),
    });
    let executor = RequestExecutor::new(RetryPolicy {
        base_delay: Duration::from_millis(200),
        ..RetryPolicy::default()
    });
    let budgeter = ContextBudgeter::new(provider.clone(), BudgetConfig::default())?;

    let schema = "(:Person {name, born})-[:KNOWS]->(:Person)";
    let user_input = "who knows Alice?";
    let history = vec![
        ChatMessage::user("show all people"),
        ChatMessage::assistant("MATCH (p:Person) RETURN p LIMIT 25"),
    ];

    info!("\n--- Prompt Assembly ---");
    let prompt = budgeter
        .prepare_prompt(
            user_input,
            "Translate the user's question into a Cypher query.",
            Some(schema),
            Some(&history),
        )
        .await;
    info!("Assembled prompt:\n{}", prompt);

    info!("\n--- First Request (cache miss, two transient failures) ---");
    let key = request_key(user_input, Some(schema));
    let query = match cache.get(&key).await.and_then(|v| CachedQuery::from_value(&v)) {
        Some(cached) => cached,
        None => {
            let response = executor.generate(provider.as_ref(), &prompt).await?;
            let record = CachedQuery::new(response.content);
            if let Some(value) = record.to_value() {
                cache.put(&key, value).await;
            }
            record
        }
    };
    info!("Generated query: {}", query.query);
    info!("Provider calls so far: {}", provider.calls.load(Ordering::SeqCst));

    info!("\n--- Second Request (cache hit, no provider call) ---");
    match cache.get(&key).await.and_then(|v| CachedQuery::from_value(&v)) {
        Some(cached) => info!("Served from cache: {}", cached.query),
        None => info!("Unexpected cache miss"),
    }
    info!("Provider calls so far: {}", provider.calls.load(Ordering::SeqCst));

    info!("\n--- Cache Diagnostics ---");
    let stats = cache.stats().await;
    info!("{}", stats);
    for entry in cache.list_entries().await {
        info!(
            "  {}: {} accesses, {} bytes, age {:?}",
            entry.key, entry.access_count, entry.data_size, entry.age
        );
    }

    cache.save_if_dirty().await;
    info!("\nCache persisted to {}", cache_file);

    info!("=== Demo Complete ===");

    Ok(())
}
