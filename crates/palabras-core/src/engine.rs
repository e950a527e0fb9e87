//! Generation runner and progress reporting.
//!
//! Sends every vocabulary word through every active model with both prompt
//! variants and persists one record per (model, word). Fully sequential:
//! each completion is awaited before the next is sent.

use std::fmt;
use std::time::{Duration, Instant};

use anyhow::Result;

use crate::completion::CompletionClient;
use crate::loader::Suite;
use crate::model::{PromptVariant, ResultRecord, VariantResult};
use crate::store::ResultStore;

/// Which pipeline stage a progress event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Generate,
    Judge,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Generate => write!(f, "generate"),
            Stage::Judge => write!(f, "judge"),
        }
    }
}

/// Progress reporting trait. Purely observational.
pub trait ProgressReporter: Send + Sync {
    fn on_model_start(&self, stage: Stage, model: &str, units: usize);
    fn on_unit_complete(&self, stage: Stage, model: &str, word: &str);
    fn on_unit_error(&self, stage: Stage, model: &str, word: &str, error: &str);
    fn on_stage_complete(&self, stage: Stage, completed: usize, failed: usize, elapsed: Duration);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_model_start(&self, _: Stage, _: &str, _: usize) {}
    fn on_unit_complete(&self, _: Stage, _: &str, _: &str) {}
    fn on_unit_error(&self, _: Stage, _: &str, _: &str, _: &str) {}
    fn on_stage_complete(&self, _: Stage, _: usize, _: usize, _: Duration) {}
}

/// Counts from one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationStats {
    /// Models processed.
    pub models: usize,
    /// Models skipped because they were commented out.
    pub skipped_models: usize,
    /// Record files written.
    pub records: usize,
    /// Variants whose completion call failed.
    pub failed_variants: usize,
}

/// Run the generation stage over the whole suite.
///
/// Models outer, words inner. Existing record files are overwritten.
pub async fn run_generation(
    client: &CompletionClient,
    suite: &Suite,
    store: &ResultStore,
    progress: &dyn ProgressReporter,
) -> Result<GenerationStats> {
    let start = Instant::now();
    let mut stats = GenerationStats::default();

    for model in &suite.models {
        if !model.active {
            tracing::info!(model = %model.name, "skipping inactive model");
            stats.skipped_models += 1;
            continue;
        }

        stats.models += 1;
        progress.on_model_start(Stage::Generate, &model.name, suite.vocabulary.len());

        for entry in &suite.vocabulary {
            let mut record = ResultRecord::new(entry, &model.name);
            let mut errors = Vec::new();

            for variant in PromptVariant::ALL {
                let prompt = suite.prompts.render(variant, &entry.word)?;
                let outcome = client
                    .complete(&model.name, &prompt)
                    .await
                    .and_then(|response| {
                        if response.is_empty() {
                            anyhow::bail!("model returned an empty response");
                        }
                        Ok(response)
                    });
                let result = match outcome {
                    Ok(response) => VariantResult::generated(prompt, response),
                    Err(e) => {
                        let detail = format!("{e:#}");
                        tracing::warn!(
                            model = %model.name,
                            word = %entry.word,
                            %variant,
                            "generation failed: {detail}"
                        );
                        errors.push(format!("{variant}: {detail}"));
                        VariantResult::failed(prompt, detail)
                    }
                };
                *record.variant_mut(variant) = result;
            }

            store.save(&record)?;
            stats.records += 1;

            if errors.is_empty() {
                progress.on_unit_complete(Stage::Generate, &model.name, &entry.word);
            } else {
                stats.failed_variants += errors.len();
                progress.on_unit_error(Stage::Generate, &model.name, &entry.word, &errors.join("; "));
            }
        }
    }

    progress.on_stage_complete(
        Stage::Generate,
        stats.records,
        stats.failed_variants,
        start.elapsed(),
    );
    tracing::info!(
        models = stats.models,
        records = stats.records,
        failed_variants = stats.failed_variants,
        "generation finished"
    );

    Ok(stats)
}
