//! Error types shared across the palabras crates.
//!
//! `LoadError` covers the suite inputs (vocabulary, model list, prompts) and is
//! always fatal for a run. `ProviderError` covers chat-completion failures; it
//! lives here so the runners can report provider failures without string
//! matching.

use std::path::PathBuf;

use thiserror::Error;

/// Failures while loading the suite inputs.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON, or has the wrong shape.
    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A required prompt variant is absent from the prompts file.
    #[error("prompts file is missing required key '{0}'")]
    MissingPrompt(String),

    /// A prompt template cannot be formatted.
    #[error("invalid template '{key}': {message}")]
    InvalidTemplate { key: String, message: String },
}

/// Errors that can occur when talking to a chat-completion provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (missing or invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested model was not found.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),
}

impl ProviderError {
    /// Returns `true` if no amount of re-running will fix this error without a
    /// configuration change.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            ProviderError::AuthenticationFailed(_) | ProviderError::ModelNotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permanent_errors() {
        assert!(ProviderError::AuthenticationFailed("bad key".into()).is_permanent());
        assert!(ProviderError::ModelNotFound("m1".into()).is_permanent());
        assert!(!ProviderError::Timeout(30).is_permanent());
        assert!(!ProviderError::RateLimited {
            retry_after_ms: 1000
        }
        .is_permanent());
    }

    #[test]
    fn load_error_messages_name_the_file() {
        let err = LoadError::Io {
            path: PathBuf::from("suite/vocabulary.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert!(err.to_string().contains("suite/vocabulary.json"));
        assert_eq!(
            LoadError::MissingPrompt("prompt_b".into()).to_string(),
            "prompts file is missing required key 'prompt_b'"
        );
    }
}
