//! Suite loaders: vocabulary, model list and prompt templates.
//!
//! Loads the three input files of a suite directory and validates them.
//! Every load failure is a [`LoadError`] and aborts the run.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::error::LoadError;
use crate::model::{ModelEntry, PromptVariant, VocabularyEntry};
use crate::store::path_component;
use crate::template::{format_template, placeholders};

/// Load a vocabulary file: a JSON array of `{"word", "answer"}` objects.
pub fn load_vocabulary(path: &Path) -> Result<Vec<VocabularyEntry>, LoadError> {
    let content = read(path)?;
    serde_json::from_str(&content).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a newline-delimited model list. Blank lines are skipped; a leading
/// `#` marks the model inactive.
pub fn load_models(path: &Path) -> Result<Vec<ModelEntry>, LoadError> {
    Ok(parse_models(&read(path)?))
}

/// Parse model list text.
pub fn parse_models(content: &str) -> Vec<ModelEntry> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let (name, active) = match line.strip_prefix('#') {
                Some(rest) => (rest.trim_start_matches('#').trim(), false),
                None => (line, true),
            };
            (!name.is_empty()).then(|| ModelEntry {
                name: name.to_string(),
                active,
            })
        })
        .collect()
}

/// Load a prompts file: a JSON object of template strings keyed by identifier.
pub fn load_prompts(path: &Path) -> Result<BTreeMap<String, String>, LoadError> {
    let content = read(path)?;
    serde_json::from_str(&content).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn read(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// The two prompt templates, checked to be formattable with a `word`.
#[derive(Debug, Clone)]
pub struct PromptTemplates {
    prompt_a: String,
    prompt_b: String,
    extra_keys: Vec<String>,
}

impl PromptTemplates {
    /// Build from a loaded prompts map. Both variants must be present and must
    /// not reference placeholders other than `word`.
    pub fn from_map(mut map: BTreeMap<String, String>) -> Result<Self, LoadError> {
        let mut take = |variant: PromptVariant| -> Result<String, LoadError> {
            let key = variant.key();
            let template = map
                .remove(key)
                .ok_or_else(|| LoadError::MissingPrompt(key.to_string()))?;
            format_template(&template, &[("word", "")]).map_err(|message| {
                LoadError::InvalidTemplate {
                    key: key.to_string(),
                    message,
                }
            })?;
            Ok(template)
        };

        let prompt_a = take(PromptVariant::PromptA)?;
        let prompt_b = take(PromptVariant::PromptB)?;

        Ok(Self {
            prompt_a,
            prompt_b,
            extra_keys: map.into_keys().collect(),
        })
    }

    pub fn template(&self, variant: PromptVariant) -> &str {
        match variant {
            PromptVariant::PromptA => &self.prompt_a,
            PromptVariant::PromptB => &self.prompt_b,
        }
    }

    /// Format one variant for a word.
    pub fn render(&self, variant: PromptVariant, word: &str) -> Result<String, LoadError> {
        format_template(self.template(variant), &[("word", word)]).map_err(|message| {
            LoadError::InvalidTemplate {
                key: variant.key().to_string(),
                message,
            }
        })
    }

    /// Keys in the prompts file other than the two variants.
    pub fn extra_keys(&self) -> &[String] {
        &self.extra_keys
    }
}

/// Locations of the three suite input files.
#[derive(Debug, Clone)]
pub struct SuitePaths {
    pub vocabulary: PathBuf,
    pub prompts: PathBuf,
    pub models: PathBuf,
}

impl SuitePaths {
    /// Default file names inside a suite directory.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            vocabulary: dir.join("vocabulary_short.json"),
            prompts: dir.join("prompts.json"),
            models: dir.join("models_list.txt"),
        }
    }
}

/// All inputs needed for a run.
#[derive(Debug, Clone)]
pub struct Suite {
    pub vocabulary: Vec<VocabularyEntry>,
    pub models: Vec<ModelEntry>,
    pub prompts: PromptTemplates,
}

impl Suite {
    pub fn load(paths: &SuitePaths) -> Result<Self, LoadError> {
        let vocabulary = load_vocabulary(&paths.vocabulary)?;
        let prompts = PromptTemplates::from_map(load_prompts(&paths.prompts)?)?;
        let models = load_models(&paths.models)?;
        tracing::debug!(
            words = vocabulary.len(),
            models = models.len(),
            "suite loaded"
        );
        Ok(Self {
            vocabulary,
            models,
            prompts,
        })
    }

    pub fn word_count(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn word(&self, index: usize) -> Option<&VocabularyEntry> {
        self.vocabulary.get(index)
    }

    pub fn active_models(&self) -> impl Iterator<Item = &ModelEntry> {
        self.models.iter().filter(|m| m.active)
    }
}

/// A non-fatal problem found in a suite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// Word the warning refers to, if any.
    pub word: Option<String>,
    pub message: String,
}

impl ValidationWarning {
    fn general(message: impl Into<String>) -> Self {
        Self {
            word: None,
            message: message.into(),
        }
    }

    fn for_word(word: &str, message: impl Into<String>) -> Self {
        Self {
            word: Some(word.to_string()),
            message: message.into(),
        }
    }
}

/// Check a loaded suite for problems that do not prevent a run.
pub fn validate_suite(suite: &Suite) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if suite.vocabulary.is_empty() {
        warnings.push(ValidationWarning::general("vocabulary is empty"));
    }

    let mut seen = HashSet::new();
    let mut files = HashMap::new();
    for entry in &suite.vocabulary {
        if entry.word.trim().is_empty() {
            warnings.push(ValidationWarning::general("entry with an empty word"));
            continue;
        }
        if !seen.insert(entry.word.as_str()) {
            warnings.push(ValidationWarning::for_word(
                &entry.word,
                "duplicate word; later results overwrite earlier ones",
            ));
        } else if let Some(other) = files.insert(path_component(&entry.word), &entry.word) {
            warnings.push(ValidationWarning::for_word(
                &entry.word,
                format!("shares a result file with '{other}'; one overwrites the other"),
            ));
        }
        if entry.answer.trim().is_empty() {
            warnings.push(ValidationWarning::for_word(&entry.word, "empty answer"));
        }
    }

    for variant in PromptVariant::ALL {
        let names = placeholders(suite.prompts.template(variant));
        if !names.iter().any(|n| n == "word") {
            warnings.push(ValidationWarning::general(format!(
                "{variant} does not contain a {{word}} placeholder"
            )));
        }
    }

    for key in suite.prompts.extra_keys() {
        warnings.push(ValidationWarning::general(format!(
            "prompt '{key}' is not a known variant and will be ignored"
        )));
    }

    let mut dirs = HashMap::new();
    for model in suite.active_models() {
        if let Some(other) = dirs.insert(path_component(&model.name), &model.name) {
            if *other != model.name {
                warnings.push(ValidationWarning::general(format!(
                    "models '{other}' and '{}' share a result directory",
                    model.name
                )));
            }
        }
    }

    if suite.active_models().next().is_none() {
        warnings.push(ValidationWarning::general("no active models"));
    }

    warnings
}
