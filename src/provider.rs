//! Provider seam for the remote text-generation collaborator
//!
//! The orchestration layer never talks to an API directly; it consumes an
//! [`LlmProvider`] injected at construction time. Real provider
//! implementations (HTTP clients, SDK bindings) live outside this crate.

use crate::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Token accounting reported by a provider alongside a generation, when the
/// API exposes it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

/// A single completed generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    /// Generated text
    pub content: String,

    /// Token accounting, if the provider reports it
    pub token_usage: Option<TokenUsage>,

    /// Model that actually served the request
    pub model_name: Option<String>,
}

impl LlmResponse {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            token_usage: None,
            model_name: None,
        }
    }
}

/// Speaker role for a conversation history message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "USER"),
            Role::Assistant => write!(f, "ASSISTANT"),
            Role::System => write!(f, "SYSTEM"),
        }
    }
}

/// One turn of conversation history, rendered as a `ROLE: content` line when
/// included in a prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    /// Render as a single prompt line.
    pub fn render(&self) -> String {
        format!("{}: {}", self.role, self.content)
    }
}

/// Capability contract for a remote text-generation provider.
///
/// Both methods may fail; the executor classifies generation failures and
/// the budgeter falls back to character-based estimation when token counting
/// fails.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Perform exactly one generation call against the remote API.
    async fn generate(&self, prompt: &str) -> Result<LlmResponse, ProviderError>;

    /// Count tokens for the given text using the provider's tokenizer.
    async fn count_tokens(&self, text: &str) -> Result<usize, ProviderError>;
}
