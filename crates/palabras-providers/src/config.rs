//! Harness configuration and provider factory.
//!
//! The configuration is loaded once at startup and handed to every component
//! that needs it; there is no global client state.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use palabras_core::completion::SamplingParams;
use palabras_core::loader::SuitePaths;
use palabras_core::traits::LlmProvider;

use crate::mock::MockProvider;
use crate::ollama::{self, OllamaProvider};
use crate::openai::OpenAiProvider;

/// Configuration for a single chat-completion backend.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    OpenAI {
        #[serde(default)]
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
    },
    Ollama {
        #[serde(default = "default_ollama_url")]
        base_url: String,
    },
    /// Answers every prompt with a fixed reply; for dry runs.
    Mock {
        #[serde(default)]
        reply: String,
    },
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::OpenAI {
                api_key: _,
                base_url,
            } => f
                .debug_struct("OpenAI")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .finish(),
            ProviderConfig::Ollama { base_url } => f
                .debug_struct("Ollama")
                .field("base_url", base_url)
                .finish(),
            ProviderConfig::Mock { reply } => {
                f.debug_struct("Mock").field("reply", reply).finish()
            }
        }
    }
}

fn default_ollama_url() -> String {
    ollama::DEFAULT_BASE_URL.to_string()
}

/// The judge model and where it is served.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeConfig {
    /// Fixed judge model identifier.
    #[serde(default = "default_judge_model")]
    pub model: String,
    #[serde(default = "default_judge_provider")]
    pub provider: ProviderConfig,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            model: default_judge_model(),
            provider: default_judge_provider(),
        }
    }
}

fn default_judge_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_judge_provider() -> ProviderConfig {
    ProviderConfig::OpenAI {
        api_key: "${OPENAI_API_KEY}".to_string(),
        base_url: None,
    }
}

/// Top-level palabras configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Directory holding the suite input files.
    #[serde(default = "default_suite_dir")]
    pub suite_dir: PathBuf,
    #[serde(default = "default_vocabulary_file")]
    pub vocabulary_file: String,
    #[serde(default = "default_prompts_file")]
    pub prompts_file: String,
    #[serde(default = "default_models_file")]
    pub models_file: String,
    /// Root of the result store.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Where the summary is written.
    #[serde(default = "default_summary_file")]
    pub summary_file: PathBuf,
    /// Sampling temperature for every request.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Max output tokens for every request.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Backend serving the models under test.
    #[serde(default = "default_generator")]
    pub generator: ProviderConfig,
    #[serde(default)]
    pub judge: JudgeConfig,
}

fn default_suite_dir() -> PathBuf {
    PathBuf::from("suite")
}
fn default_vocabulary_file() -> String {
    "vocabulary_short.json".to_string()
}
fn default_prompts_file() -> String {
    "prompts.json".to_string()
}
fn default_models_file() -> String {
    "models_list.txt".to_string()
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}
fn default_summary_file() -> PathBuf {
    PathBuf::from("summary.json")
}
fn default_temperature() -> f64 {
    SamplingParams::default().temperature
}
fn default_max_tokens() -> u32 {
    SamplingParams::default().max_tokens
}
fn default_generator() -> ProviderConfig {
    ProviderConfig::Ollama {
        base_url: default_ollama_url(),
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            suite_dir: default_suite_dir(),
            vocabulary_file: default_vocabulary_file(),
            prompts_file: default_prompts_file(),
            models_file: default_models_file(),
            output_dir: default_output_dir(),
            summary_file: default_summary_file(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            generator: default_generator(),
            judge: JudgeConfig::default(),
        }
    }
}

impl HarnessConfig {
    /// Paths of the three suite input files.
    pub fn suite_paths(&self) -> SuitePaths {
        SuitePaths {
            vocabulary: self.suite_dir.join(&self.vocabulary_file),
            prompts: self.suite_dir.join(&self.prompts_file),
            models: self.suite_dir.join(&self.models_file),
        }
    }

    pub fn sampling(&self) -> SamplingParams {
        SamplingParams {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    match config {
        ProviderConfig::OpenAI { api_key, base_url } => ProviderConfig::OpenAI {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
        },
        ProviderConfig::Ollama { base_url } => ProviderConfig::Ollama {
            base_url: resolve_env_vars(base_url),
        },
        ProviderConfig::Mock { reply } => ProviderConfig::Mock {
            reply: reply.clone(),
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `palabras.toml` in the current directory
/// 2. `~/.config/palabras/config.toml`
///
/// Environment variable override: `PALABRAS_JUDGE_KEY`.
pub fn load_config() -> Result<HarnessConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<HarnessConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("palabras.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<HarnessConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => HarnessConfig::default(),
    };

    config.generator = resolve_provider_config(&config.generator);
    config.judge.provider = resolve_provider_config(&config.judge.provider);

    if let Ok(key) = std::env::var("PALABRAS_JUDGE_KEY") {
        if let ProviderConfig::OpenAI { api_key, .. } = &mut config.judge.provider {
            tracing::debug!("judge key taken from PALABRAS_JUDGE_KEY");
            *api_key = key;
        }
    }

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("palabras"))
}

/// Create a provider instance from its configuration.
pub fn create_provider(config: &ProviderConfig) -> Result<Box<dyn LlmProvider>> {
    match config {
        ProviderConfig::OpenAI { api_key, base_url } => {
            Ok(Box::new(OpenAiProvider::new(api_key, base_url.clone())?))
        }
        ProviderConfig::Ollama { base_url } => Ok(Box::new(OllamaProvider::new(base_url)?)),
        ProviderConfig::Mock { reply } => Ok(Box::new(MockProvider::with_fixed_response(reply))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_PALABRAS_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_PALABRAS_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_PALABRAS_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("${_PALABRAS_UNSET_VAR}"), "");
        assert_eq!(resolve_env_vars("no_close_${brace"), "no_close_${brace");
        std::env::remove_var("_PALABRAS_TEST_VAR");
    }

    #[test]
    fn resolved_values_are_not_rescanned() {
        std::env::set_var("_PALABRAS_SELF_REF", "${_PALABRAS_SELF_REF}");
        assert_eq!(
            resolve_env_vars("key=${_PALABRAS_SELF_REF}!"),
            "key=${_PALABRAS_SELF_REF}!"
        );
        std::env::remove_var("_PALABRAS_SELF_REF");
    }

    #[test]
    fn judge_key_env_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("palabras.toml");
        std::fs::write(
            &path,
            r#"
[judge.provider]
type = "openai"
api_key = "sk-from-file"
"#,
        )
        .unwrap();

        std::env::set_var("PALABRAS_JUDGE_KEY", "sk-from-env");
        let config = load_config_from(Some(&path));
        std::env::remove_var("PALABRAS_JUDGE_KEY");

        assert!(matches!(
            config.unwrap().judge.provider,
            ProviderConfig::OpenAI { ref api_key, .. } if api_key == "sk-from-env"
        ));
    }

    #[test]
    fn default_config() {
        let config = HarnessConfig::default();
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.max_tokens, 500);
        assert_eq!(config.judge.model, "gpt-4o-mini");
        assert!(matches!(
            config.generator,
            ProviderConfig::Ollama { ref base_url } if base_url == "http://localhost:11434"
        ));
        let paths = config.suite_paths();
        assert_eq!(paths.vocabulary, PathBuf::from("suite/vocabulary_short.json"));
        assert_eq!(paths.models, PathBuf::from("suite/models_list.txt"));
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
suite_dir = "data"
vocabulary_file = "vocabulary_full.json"
output_dir = "runs/today"
temperature = 0.2

[generator]
type = "openai"
base_url = "http://localhost:1234"

[judge]
model = "gpt-4.1-mini"

[judge.provider]
type = "openai"
api_key = "sk-test"
"#;
        let config: HarnessConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.suite_paths().vocabulary,
            PathBuf::from("data/vocabulary_full.json")
        );
        assert_eq!(config.output_dir, PathBuf::from("runs/today"));
        assert_eq!(config.sampling().temperature, 0.2);
        assert_eq!(config.sampling().max_tokens, 500);
        assert_eq!(config.judge.model, "gpt-4.1-mini");
        assert!(matches!(
            config.generator,
            ProviderConfig::OpenAI { ref api_key, .. } if api_key.is_empty()
        ));
    }

    #[test]
    fn debug_masks_keys() {
        let config = ProviderConfig::OpenAI {
            api_key: "sk-secret".into(),
            base_url: None,
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn explicit_missing_config_fails() {
        let err = load_config_from(Some(Path::new("/nonexistent/palabras.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn load_from_file_resolves_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("palabras.toml");
        std::fs::write(
            &path,
            r#"
[generator]
type = "ollama"
base_url = "${_PALABRAS_TEST_OLLAMA}"

[judge.provider]
type = "mock"
reply = "correct"
"#,
        )
        .unwrap();
        std::env::set_var("_PALABRAS_TEST_OLLAMA", "http://gpu-box:11434");

        let config = load_config_from(Some(&path)).unwrap();
        assert!(matches!(
            config.generator,
            ProviderConfig::Ollama { ref base_url } if base_url == "http://gpu-box:11434"
        ));
        assert_eq!(config.judge.model, "gpt-4o-mini");
        assert!(matches!(config.judge.provider, ProviderConfig::Mock { .. }));
        std::env::remove_var("_PALABRAS_TEST_OLLAMA");
    }

    #[test]
    fn factory_builds_each_kind() {
        let ollama = create_provider(&default_generator()).unwrap();
        assert_eq!(ollama.name(), "ollama");
        let openai = create_provider(&default_judge_provider()).unwrap();
        assert_eq!(openai.name(), "openai");
        let mock = create_provider(&ProviderConfig::Mock {
            reply: "ok".into(),
        })
        .unwrap();
        assert_eq!(mock.name(), "mock");
    }
}
