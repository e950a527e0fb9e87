//! Chat-completion provider trait.
//!
//! Implemented by the backends in `palabras-providers`. The runners only ever
//! see `dyn LlmProvider`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A chat-completion backend.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g. "ollama").
    fn name(&self) -> &str;

    /// Send one single-turn chat request.
    async fn chat(&self, request: &ChatRequest) -> anyhow::Result<ChatResponse>;
}

/// One user-role message plus sampling parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model identifier (e.g. "llama3.1:8b").
    pub model: String,
    /// Fully substituted prompt, sent as the only user message.
    pub prompt: String,
    pub temperature: f64,
    /// Maximum output tokens.
    pub max_tokens: u32,
}

/// Assistant reply from a chat request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Raw assistant text.
    pub content: String,
    /// Model that actually answered.
    pub model: String,
    /// Wall-clock request latency in milliseconds.
    pub latency_ms: u64,
}
