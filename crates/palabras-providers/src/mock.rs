//! Scripted provider for tests and dry runs.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use palabras_core::error::ProviderError;
use palabras_core::traits::{ChatRequest, ChatResponse, LlmProvider};

/// A mock provider that answers from a script instead of calling an API.
///
/// Replies are chosen by the first rule whose substring occurs in the prompt;
/// unmatched prompts get the default reply.
pub struct MockProvider {
    /// (prompt substring, reply) rules, checked in order.
    rules: Vec<(String, Reply)>,
    default: Reply,
    call_count: AtomicU32,
    requests: Mutex<Vec<ChatRequest>>,
}

#[derive(Clone)]
enum Reply {
    Text(String),
    Fail(String),
}

impl MockProvider {
    /// A mock that always returns `reply`.
    pub fn with_fixed_response(reply: &str) -> Self {
        Self::with_default(Reply::Text(reply.to_string()))
    }

    /// A mock whose every call fails with a network error.
    pub fn failing(message: &str) -> Self {
        Self::with_default(Reply::Fail(message.to_string()))
    }

    fn with_default(default: Reply) -> Self {
        Self {
            rules: Vec::new(),
            default,
            call_count: AtomicU32::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Reply with `reply` whenever the prompt contains `needle`.
    pub fn reply_when(mut self, needle: &str, reply: &str) -> Self {
        self.rules
            .push((needle.to_string(), Reply::Text(reply.to_string())));
        self
    }

    /// Fail whenever the prompt contains `needle`.
    pub fn fail_when(mut self, needle: &str, message: &str) -> Self {
        self.rules
            .push((needle.to_string(), Reply::Fail(message.to_string())));
        self
    }

    /// Number of calls made to this provider.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Every request received, in order.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// The last request received.
    pub fn last_request(&self) -> Option<ChatRequest> {
        self.requests().pop()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn chat(&self, request: &ChatRequest) -> anyhow::Result<ChatResponse> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        let reply = self
            .rules
            .iter()
            .find(|(needle, _)| request.prompt.contains(needle.as_str()))
            .map(|(_, reply)| reply)
            .unwrap_or(&self.default);

        match reply {
            Reply::Text(content) => Ok(ChatResponse {
                content: content.clone(),
                model: request.model.clone(),
                latency_ms: 1,
            }),
            Reply::Fail(message) => Err(ProviderError::NetworkError(message.clone()).into()),
        }
    }
}
