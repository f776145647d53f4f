//! Token-budget enforcement for prompt assembly
//!
//! Builds the final prompt from prioritized components (system instruction,
//! user input, context data, conversation history) and guarantees the
//! result fits the model's window minus a reserve for the answer. Lower-priority components are truncated or dropped first, and a
//! marker is appended wherever truncation occurred so callers can detect
//! it.

use crate::error::{LlmError, Result};
use crate::provider::{ChatMessage, LlmProvider};
use std::sync::Arc;
use tracing::{debug, warn};

/// Marker appended to context data that was cut to fit the budget.
pub const TRUNCATION_MARKER: &str = "\n...[truncated]...";

/// Budget configuration for prompt assembly.
///
/// The character-per-token ratios are heuristics, not tokenizer facts, and
/// are deliberately configurable: the estimate ratio backs the fallback when
/// real token counting fails, and the truncation ratio converts a remaining
/// token budget into a character count.
#[derive(Debug, Clone)]
pub struct BudgetConfig {
    /// Hard ceiling on the prompt's estimated token cost
    pub max_tokens: usize,

    /// Tokens reserved for the model's answer
    pub output_reserve: usize,

    /// Characters per token assumed when token counting fails
    pub estimate_chars_per_token: usize,

    /// Characters granted per remaining token when truncating
    pub truncate_chars_per_token: usize,

    /// Floor on truncated context data, in characters
    pub min_context_chars: usize,

    /// Floor on truncated history, in characters
    pub min_history_chars: usize,

    /// History is only considered when more than this many tokens remain
    pub history_reserve_tokens: usize,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            max_tokens: 30_000,
            output_reserve: 1_000,
            estimate_chars_per_token: 4,
            truncate_chars_per_token: 3,
            min_context_chars: 500,
            min_history_chars: 200,
            history_reserve_tokens: 100,
        }
    }
}

impl BudgetConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.output_reserve >= self.max_tokens {
            return Err(LlmError::Config(
                "output_reserve must be smaller than max_tokens".to_string(),
            ));
        }
        if self.estimate_chars_per_token == 0 || self.truncate_chars_per_token == 0 {
            return Err(LlmError::Config(
                "character-per-token ratios must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Assembles token-bounded prompts from prioritized components.
///
/// Priority is fixed: system instruction, then user input, then context
/// data, then history. `prepare_prompt` is infallible; every internal
/// failure degrades toward a minimal prompt that still carries the user's
/// input.
pub struct ContextBudgeter {
    provider: Arc<dyn LlmProvider>,
    config: BudgetConfig,
}

impl ContextBudgeter {
    /// Create a budgeter around an injected provider.
    pub fn new(provider: Arc<dyn LlmProvider>, config: BudgetConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { provider, config })
    }

    /// The active budget configuration.
    pub fn config(&self) -> &BudgetConfig {
        &self.config
    }

    /// Build the final prompt, guaranteed to stay within
    /// `max_tokens - output_reserve` estimated tokens.
    ///
    /// Context data is included verbatim when it fits, truncated with
    /// [`TRUNCATION_MARKER`] otherwise. History is rendered as
    /// `ROLE: content` lines and only included when budget remains after
    /// the context; when cut, it keeps the most recent lines under a
    /// `Conversation History (truncated):` header.
    pub async fn prepare_prompt(
        &self,
        user_input: &str,
        system_instruction: &str,
        context_data: Option<&str>,
        history: Option<&[ChatMessage]>,
    ) -> String {
        let mut user_input = user_input.to_string();

        let system_tokens = self.safe_count_tokens(system_instruction).await;
        let user_tokens = self.safe_count_tokens(&user_input).await;

        let budget = self.config.max_tokens - self.config.output_reserve;
        let mut available = match budget.checked_sub(system_tokens + user_tokens) {
            Some(available) => available,
            None => {
                // Last-resort safety valve: the fixed components alone blow
                // the budget
                warn!("System instruction and user input exceed the token budget, halving user input");
                let half = user_input.chars().count() / 2;
                user_input = head_chars(&user_input, half).to_string();
                0
            }
        };

        let context_block = match context_data.filter(|c| !c.is_empty()) {
            Some(context) => {
                let context_tokens = self.safe_count_tokens(context).await;
                let text = if context_tokens <= available {
                    available -= context_tokens;
                    context.to_string()
                } else {
                    debug!(
                        "Context data too large ({} > {} tokens), truncating",
                        context_tokens, available
                    );
                    let keep = (available * self.config.truncate_chars_per_token)
                        .max(self.config.min_context_chars);
                    available = 0;
                    format!("{}{}", head_chars(context, keep), TRUNCATION_MARKER)
                };
                Some(format!("### CONTEXT:\n{}\n", text))
            }
            None => None,
        };

        let history_block = match history.filter(|h| !h.is_empty()) {
            Some(history) if available > self.config.history_reserve_tokens => {
                let rendered: Vec<String> = history.iter().map(|msg| msg.render()).collect();
                let history_text = rendered.join("\n");
                let history_tokens = self.safe_count_tokens(&history_text).await;

                if history_tokens <= available {
                    Some(format!("\nConversation History:\n{}", history_text))
                } else {
                    let keep = (available * self.config.truncate_chars_per_token)
                        .max(self.config.min_history_chars);
                    let mut tail = tail_chars(&history_text, keep);
                    // Drop the leading partial line
                    if let Some(newline) = tail.find('\n') {
                        tail = &tail[newline + 1..];
                    }
                    Some(format!("\nConversation History (truncated):\n{}", tail))
                }
            }
            _ => None,
        };

        let mut parts = Vec::new();
        if let Some(block) = context_block {
            parts.push(block);
        }
        if let Some(block) = history_block {
            parts.push(block);
        }
        parts.push(format!("\nUser Input: {}", user_input));

        parts.join("\n")
    }

    /// Count tokens via the provider, falling back to a character-based
    /// estimate when counting fails. Empty text costs nothing.
    async fn safe_count_tokens(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }

        match self.provider.count_tokens(text).await {
            Ok(tokens) => tokens,
            Err(e) => {
                warn!("Token counting failed, using estimate: {}", e);
                text.chars().count() / self.config.estimate_chars_per_token
            }
        }
    }
}

/// First `n` characters of `s`, respecting char boundaries.
fn head_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Last `n` characters of `s`, respecting char boundaries.
fn tail_chars(s: &str, n: usize) -> &str {
    let len = s.chars().count();
    match len.checked_sub(n) {
        Some(skip) => match s.char_indices().nth(skip) {
            Some((idx, _)) => &s[idx..],
            None => s,
        },
        None => s,
    }
}
