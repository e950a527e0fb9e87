//! The completion generator: one provider, fixed sampling parameters.

use std::sync::Arc;

use anyhow::Result;

use crate::traits::{ChatRequest, LlmProvider};

/// Sampling parameters sent with every request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 500,
        }
    }
}

/// Sends prompts to a provider and returns trimmed reply text.
///
/// Failures come back as `Err`; nothing is retried.
#[derive(Clone)]
pub struct CompletionClient {
    provider: Arc<dyn LlmProvider>,
    params: SamplingParams,
}

impl CompletionClient {
    pub fn new(provider: Arc<dyn LlmProvider>, params: SamplingParams) -> Self {
        Self { provider, params }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Send `prompt` to `model` and return the trimmed reply.
    pub async fn complete(&self, model: &str, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: model.to_string(),
            prompt: prompt.to_string(),
            temperature: self.params.temperature,
            max_tokens: self.params.max_tokens,
        };
        let response = self.provider.chat(&request).await?;
        tracing::debug!(
            provider = self.provider.name(),
            model,
            latency_ms = response.latency_ms,
            "completion received"
        );
        Ok(response.content.trim().to_string())
    }
}

impl std::fmt::Debug for CompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionClient")
            .field("provider", &self.provider.name())
            .field("params", &self.params)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::traits::ChatResponse;

    struct Echo {
        seen: Mutex<Vec<ChatRequest>>,
    }

    #[async_trait]
    impl LlmProvider for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
            self.seen.lock().unwrap().push(request.clone());
            if request.prompt == "fail" {
                anyhow::bail!("connection refused");
            }
            Ok(ChatResponse {
                content: format!("  \n{}\n ", request.prompt),
                model: request.model.clone(),
                latency_ms: 0,
            })
        }
    }

    #[tokio::test]
    async fn trims_reply_and_sends_params() {
        let echo = Arc::new(Echo {
            seen: Mutex::new(Vec::new()),
        });
        let client = CompletionClient::new(echo.clone(), SamplingParams::default());

        let reply = client.complete("m1", "Define casa").await.unwrap();
        assert_eq!(reply, "Define casa");

        let seen = echo.seen.lock().unwrap();
        assert_eq!(seen[0].model, "m1");
        assert_eq!(seen[0].temperature, 0.7);
        assert_eq!(seen[0].max_tokens, 500);
    }

    #[tokio::test]
    async fn failure_is_an_error_not_text() {
        let echo = Arc::new(Echo {
            seen: Mutex::new(Vec::new()),
        });
        let client = CompletionClient::new(echo, SamplingParams::default());
        let err = client.complete("m1", "fail").await.unwrap_err();
        assert!(err.to_string().contains("connection refused"));
    }
}
