//! Per-model accuracy summary, recomputed from the result store.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::{PromptVariant, ResultRecord, Verdict};
use crate::store::ResultStore;

/// Correct/total tallies for one model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub prompt_a_correct: u32,
    pub prompt_a_total: u32,
    pub prompt_b_correct: u32,
    pub prompt_b_total: u32,
    /// Variants whose generation failed; never part of `total`.
    #[serde(default)]
    pub prompt_a_errors: u32,
    #[serde(default)]
    pub prompt_b_errors: u32,
}

impl SummaryEntry {
    /// `(correct, total)` for a variant.
    pub fn counts(&self, variant: PromptVariant) -> (u32, u32) {
        match variant {
            PromptVariant::PromptA => (self.prompt_a_correct, self.prompt_a_total),
            PromptVariant::PromptB => (self.prompt_b_correct, self.prompt_b_total),
        }
    }

    pub fn errors(&self, variant: PromptVariant) -> u32 {
        match variant {
            PromptVariant::PromptA => self.prompt_a_errors,
            PromptVariant::PromptB => self.prompt_b_errors,
        }
    }

    /// Fraction correct, or `None` when nothing was counted.
    pub fn accuracy(&self, variant: PromptVariant) -> Option<f64> {
        let (correct, total) = self.counts(variant);
        (total > 0).then(|| correct as f64 / total as f64)
    }

    fn add(&mut self, record: &ResultRecord) {
        for variant in PromptVariant::ALL {
            let result = record.variant(variant);
            let (correct, total, errors) = match variant {
                PromptVariant::PromptA => (
                    &mut self.prompt_a_correct,
                    &mut self.prompt_a_total,
                    &mut self.prompt_a_errors,
                ),
                PromptVariant::PromptB => (
                    &mut self.prompt_b_correct,
                    &mut self.prompt_b_total,
                    &mut self.prompt_b_errors,
                ),
            };
            if result.is_failed() {
                *errors += 1;
            }
            if result.has_response() {
                *total += 1;
            }
            if result.judge_result == Some(Verdict::Correct) {
                *correct += 1;
            }
        }
    }
}

/// Summary for every model directory, keyed by directory name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Summary {
    pub models: BTreeMap<String, SummaryEntry>,
}

impl Summary {
    /// Save the summary as pretty JSON.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize summary")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write summary to {}", path.display()))?;
        Ok(())
    }

    /// Load a summary from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read summary from {}", path.display()))?;
        serde_json::from_str(&content).context("failed to parse summary JSON")
    }
}

/// Walk the store and tally every record, keyed by model name. Unreadable
/// files are skipped; a directory with nothing readable gets zero counts.
pub fn build_summary(store: &ResultStore) -> Result<Summary> {
    let mut summary = Summary::default();

    for dir in store.model_dirs()? {
        let mut tallied = false;
        for path in ResultStore::record_files(&dir.path)? {
            match ResultStore::load(&path) {
                Ok(record) => {
                    // Records carry the model name as listed; older files fall
                    // back to the directory name.
                    let key = if record.model.is_empty() {
                        dir.name.clone()
                    } else {
                        record.model.clone()
                    };
                    summary.models.entry(key).or_default().add(&record);
                    tallied = true;
                }
                Err(e) => tracing::warn!("skipping unreadable record: {e:#}"),
            }
        }
        if !tallied {
            summary.models.entry(dir.name.clone()).or_default();
        }
    }

    tracing::info!(models = summary.models.len(), "summary built");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{VariantResult, VocabularyEntry};

    fn record(word: &str, a: VariantResult, b: VariantResult) -> ResultRecord {
        let mut record = ResultRecord::new(
            &VocabularyEntry {
                word: word.into(),
                answer: "x".into(),
            },
            "M",
        );
        record.prompt_a = a;
        record.prompt_b = b;
        record
    }

    fn judged(verdict: Verdict) -> VariantResult {
        let mut v = VariantResult::generated("p", "response");
        v.set_verdict(verdict, verdict.to_string());
        v
    }

    #[test]
    fn empty_responses_are_not_counted() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path());
        store
            .save(&record("uno", judged(Verdict::Correct), judged(Verdict::Incorrect)))
            .unwrap();
        store
            .save(&record("dos", judged(Verdict::Correct), judged(Verdict::Correct)))
            .unwrap();
        store
            .save(&record(
                "tres",
                VariantResult::generated("p", ""),
                VariantResult::failed("p", "timeout"),
            ))
            .unwrap();

        let summary = build_summary(&store).unwrap();
        let m = summary.models["M"];
        assert_eq!(m.prompt_a_total, 2);
        assert_eq!(m.prompt_a_correct, 2);
        assert_eq!(m.prompt_b_total, 2);
        assert_eq!(m.prompt_b_correct, 1);
        assert_eq!(m.prompt_b_errors, 1);
        assert_eq!(m.prompt_a_errors, 0);
        assert_eq!(m.accuracy(PromptVariant::PromptB), Some(0.5));
    }

    #[test]
    fn unjudged_responses_count_towards_total_only() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path());
        store
            .save(&record(
                "uno",
                VariantResult::generated("p", "r"),
                VariantResult::generated("p", "r"),
            ))
            .unwrap();

        let m = build_summary(&store).unwrap().models["M"];
        assert_eq!(m.counts(PromptVariant::PromptA), (0, 1));
    }

    #[test]
    fn keyed_by_listed_model_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path());
        let mut rec = record("uno", judged(Verdict::Correct), judged(Verdict::Correct));
        rec.model = "org/llama".into();
        store.save(&rec).unwrap();
        assert!(dir.path().join("org_llama").is_dir());

        let summary = build_summary(&store).unwrap();
        assert_eq!(summary.models.len(), 1);
        assert_eq!(summary.models["org/llama"].counts(PromptVariant::PromptA), (1, 1));
    }

    #[test]
    fn empty_and_missing_dirs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("idle-model")).unwrap();
        let summary = build_summary(&ResultStore::new(dir.path())).unwrap();
        assert_eq!(summary.models["idle-model"], SummaryEntry::default());
        assert_eq!(summary.models["idle-model"].accuracy(PromptVariant::PromptA), None);

        let missing = build_summary(&ResultStore::new(dir.path().join("nope"))).unwrap();
        assert!(missing.models.is_empty());
    }

    #[test]
    fn summary_json_shape() {
        let dir = tempfile::tempdir().unwrap();
        let mut summary = Summary::default();
        summary.models.insert(
            "m1".into(),
            SummaryEntry {
                prompt_a_correct: 1,
                prompt_a_total: 2,
                prompt_b_correct: 0,
                prompt_b_total: 2,
                ..Default::default()
            },
        );
        let path = dir.path().join("summary.json");
        summary.save_json(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["m1"]["prompt_a_correct"], 1);
        assert_eq!(value["m1"]["prompt_b_total"], 2);
        assert_eq!(Summary::load_json(&path).unwrap(), summary);
    }

    #[test]
    fn loads_summary_without_error_counts() {
        let json = r#"{"m1": {"prompt_a_correct": 3, "prompt_a_total": 4, "prompt_b_correct": 1, "prompt_b_total": 4}}"#;
        let summary: Summary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.models["m1"].prompt_a_errors, 0);
        assert_eq!(summary.models["m1"].counts(PromptVariant::PromptA), (3, 4));
    }
}
