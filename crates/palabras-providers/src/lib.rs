//! palabras-providers — chat-completion backends.
//!
//! Implements the `LlmProvider` trait for a local Ollama server and for
//! OpenAI-compatible APIs, plus a scripted mock, and loads the harness
//! configuration that selects between them.

pub mod config;
pub mod mock;
pub mod ollama;
pub mod openai;

pub use config::{create_provider, load_config, HarnessConfig, JudgeConfig, ProviderConfig};
pub use palabras_core::error::ProviderError;
