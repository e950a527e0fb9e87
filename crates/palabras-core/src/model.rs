//! Core data model types for palabras.
//!
//! Suite inputs (vocabulary, model list, prompt templates) are immutable once
//! loaded. `ResultRecord` is the unit of persisted state: one per
//! (model, word), holding both prompt variants.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current on-disk version of result records.
pub const SCHEMA_VERSION: u32 = 1;

/// A vocabulary word with its reference answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub word: String,
    pub answer: String,
}

/// One line of the model list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelEntry {
    /// Model name with any leading `#` stripped.
    pub name: String,
    /// `false` when the line was commented out.
    pub active: bool,
}

/// The two fixed task templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PromptVariant {
    /// "Define the word."
    PromptA,
    /// "Use the word in two sentences."
    PromptB,
}

impl PromptVariant {
    pub const ALL: [PromptVariant; 2] = [PromptVariant::PromptA, PromptVariant::PromptB];

    /// Key of this variant in the prompts file.
    pub fn key(self) -> &'static str {
        match self {
            PromptVariant::PromptA => "prompt_a",
            PromptVariant::PromptB => "prompt_b",
        }
    }
}

impl fmt::Display for PromptVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Binary grade assigned by the judge model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Correct,
    Incorrect,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Correct => write!(f, "correct"),
            Verdict::Incorrect => write!(f, "incorrect"),
        }
    }
}

impl FromStr for Verdict {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "correct" => Ok(Verdict::Correct),
            "incorrect" => Ok(Verdict::Incorrect),
            other => Err(format!("unknown verdict: '{other}'")),
        }
    }
}

/// State of a single prompt variant within a record.
///
/// Moves `generated -> judged`; once `judge_result` is set it is never
/// overwritten.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantResult {
    /// Fully substituted prompt sent to the model.
    pub prompt: String,
    /// Trimmed model reply; empty when generation failed.
    pub model_response: String,
    /// Failure detail when the completion call failed.
    pub generation_error: Option<String>,
    pub judge_result: Option<Verdict>,
    /// Raw judge reply; empty until judged.
    pub judge_reasoning: String,
}

impl VariantResult {
    /// A variant whose completion succeeded.
    pub fn generated(prompt: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model_response: response.into(),
            ..Default::default()
        }
    }

    /// A variant whose completion call failed.
    pub fn failed(prompt: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            generation_error: Some(error.into()),
            ..Default::default()
        }
    }

    pub fn is_judged(&self) -> bool {
        self.judge_result.is_some()
    }

    pub fn is_failed(&self) -> bool {
        self.generation_error.is_some()
    }

    /// Counted towards the summary total.
    pub fn has_response(&self) -> bool {
        !self.model_response.is_empty()
    }

    /// Record a verdict. Returns `false` and leaves the variant untouched if it
    /// was already judged.
    pub fn set_verdict(&mut self, verdict: Verdict, reasoning: impl Into<String>) -> bool {
        if self.is_judged() {
            return false;
        }
        self.judge_result = Some(verdict);
        self.judge_reasoning = reasoning.into();
        true
    }
}

/// Persisted result for one (model, word) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RecordFile", into = "RecordFile")]
pub struct ResultRecord {
    pub word: String,
    /// Reference answer from the vocabulary.
    pub actual_definition: String,
    /// Model name as written in the model list.
    pub model: String,
    pub generated_at: Option<DateTime<Utc>>,
    pub prompt_a: VariantResult,
    pub prompt_b: VariantResult,
}

impl ResultRecord {
    pub fn new(entry: &VocabularyEntry, model: &str) -> Self {
        Self {
            word: entry.word.clone(),
            actual_definition: entry.answer.clone(),
            model: model.to_string(),
            generated_at: Some(Utc::now()),
            prompt_a: VariantResult::default(),
            prompt_b: VariantResult::default(),
        }
    }

    pub fn variant(&self, variant: PromptVariant) -> &VariantResult {
        match variant {
            PromptVariant::PromptA => &self.prompt_a,
            PromptVariant::PromptB => &self.prompt_b,
        }
    }

    pub fn variant_mut(&mut self, variant: PromptVariant) -> &mut VariantResult {
        match variant {
            PromptVariant::PromptA => &mut self.prompt_a,
            PromptVariant::PromptB => &mut self.prompt_b,
        }
    }
}

/// Flat on-disk shape of a result record (`prompt_a`, `model_response_a`, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RecordFile {
    #[serde(default = "default_schema_version")]
    schema_version: u32,
    word: String,
    actual_definition: String,
    #[serde(default)]
    model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    generated_at: Option<DateTime<Utc>>,

    #[serde(default)]
    prompt_a: String,
    #[serde(default)]
    model_response_a: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    generation_error_a: Option<String>,
    #[serde(default)]
    judge_result_a: String,
    #[serde(default)]
    judge_reasoning_a: String,

    #[serde(default)]
    prompt_b: String,
    #[serde(default)]
    model_response_b: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    generation_error_b: Option<String>,
    #[serde(default)]
    judge_result_b: String,
    #[serde(default)]
    judge_reasoning_b: String,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

fn parse_verdict(raw: &str) -> Result<Option<Verdict>, String> {
    if raw.is_empty() {
        Ok(None)
    } else {
        raw.parse().map(Some)
    }
}

fn verdict_str(verdict: Option<Verdict>) -> String {
    verdict.map(|v| v.to_string()).unwrap_or_default()
}

impl TryFrom<RecordFile> for ResultRecord {
    type Error = String;

    fn try_from(file: RecordFile) -> Result<Self, Self::Error> {
        if file.schema_version > SCHEMA_VERSION {
            return Err(format!(
                "unsupported schema_version {} (newest known is {SCHEMA_VERSION})",
                file.schema_version
            ));
        }

        Ok(ResultRecord {
            word: file.word,
            actual_definition: file.actual_definition,
            model: file.model,
            generated_at: file.generated_at,
            prompt_a: VariantResult {
                prompt: file.prompt_a,
                model_response: file.model_response_a,
                generation_error: file.generation_error_a,
                judge_result: parse_verdict(&file.judge_result_a)?,
                judge_reasoning: file.judge_reasoning_a,
            },
            prompt_b: VariantResult {
                prompt: file.prompt_b,
                model_response: file.model_response_b,
                generation_error: file.generation_error_b,
                judge_result: parse_verdict(&file.judge_result_b)?,
                judge_reasoning: file.judge_reasoning_b,
            },
        })
    }
}

impl From<ResultRecord> for RecordFile {
    fn from(record: ResultRecord) -> Self {
        let ResultRecord {
            word,
            actual_definition,
            model,
            generated_at,
            prompt_a: a,
            prompt_b: b,
        } = record;

        RecordFile {
            schema_version: SCHEMA_VERSION,
            word,
            actual_definition,
            model,
            generated_at,
            prompt_a: a.prompt,
            model_response_a: a.model_response,
            generation_error_a: a.generation_error,
            judge_result_a: verdict_str(a.judge_result),
            judge_reasoning_a: a.judge_reasoning,
            prompt_b: b.prompt,
            model_response_b: b.model_response,
            generation_error_b: b.generation_error,
            judge_result_b: verdict_str(b.judge_result),
            judge_reasoning_b: b.judge_reasoning,
        }
    }
}
