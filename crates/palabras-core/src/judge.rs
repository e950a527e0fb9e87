//! Judge runner: grades stored responses with a separate judge model.
//!
//! Only variants with a response and no verdict are sent to the judge. Each
//! verdict is written back to its record file immediately, so an interrupted
//! run can simply be started again.

use std::time::Instant;

use anyhow::Result;

use crate::completion::CompletionClient;
use crate::engine::{ProgressReporter, Stage};
use crate::error::ProviderError;
use crate::model::{PromptVariant, ResultRecord, Verdict};
use crate::store::ResultStore;

/// Classify a judge reply.
///
/// `Correct` iff the reply, lowercased, starts with `"correct"`. This is a
/// plain prefix test: "CORRECTLY stated" is correct, and so is
/// "correctness is debatable".
pub fn classify_verdict(reply: &str) -> Verdict {
    if reply.to_lowercase().starts_with("correct") {
        Verdict::Correct
    } else {
        Verdict::Incorrect
    }
}

/// Build the evaluation prompt for one variant of a record.
pub fn judge_prompt(record: &ResultRecord, variant: PromptVariant) -> String {
    let result = record.variant(variant);
    match variant {
        PromptVariant::PromptA => format!(
            "You are grading a vocabulary quiz.\n\
             Word: \"{word}\"\n\
             Reference definition: \"{answer}\"\n\
             Student definition: \"{response}\"\n\n\
             Does the student definition convey the same meaning as the reference definition? \
             Begin your reply with exactly one word, \"correct\" or \"incorrect\", \
             then give a one-sentence explanation.",
            word = record.word,
            answer = record.actual_definition,
            response = result.model_response,
        ),
        PromptVariant::PromptB => format!(
            "You are grading a vocabulary quiz.\n\
             Task given to the student: \"{task}\"\n\
             Meaning of \"{word}\": \"{answer}\"\n\
             Student answer: \"{response}\"\n\n\
             Did the student complete the task, using the word correctly with this meaning \
             in exactly two sentences? \
             Begin your reply with exactly one word, \"correct\" or \"incorrect\", \
             then give a one-sentence explanation.",
            task = result.prompt,
            word = record.word,
            answer = record.actual_definition,
            response = result.model_response,
        ),
    }
}

/// A completion client bound to the fixed judge model.
#[derive(Debug, Clone)]
pub struct Judge {
    client: CompletionClient,
    model: String,
}

impl Judge {
    pub fn new(client: CompletionClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Ask the judge about one variant. Returns the verdict and the raw reply.
    pub async fn grade(
        &self,
        record: &ResultRecord,
        variant: PromptVariant,
    ) -> Result<(Verdict, String)> {
        let prompt = judge_prompt(record, variant);
        let reply = self.client.complete(&self.model, &prompt).await?;
        Ok((classify_verdict(&reply), reply))
    }
}

/// Counts from one judging run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JudgeStats {
    /// Variants graded in this run.
    pub judged: usize,
    /// Of those, graded correct.
    pub correct: usize,
    /// Variants that already had a verdict.
    pub already_judged: usize,
    /// Variants with no response to grade (failed generation).
    pub skipped: usize,
    /// Judge calls that failed; these stay unjudged.
    pub failed: usize,
    /// Record files that could not be read.
    pub unreadable: usize,
}

/// Run the judge stage over every record in the store.
pub async fn run_judging(
    judge: &Judge,
    store: &ResultStore,
    progress: &dyn ProgressReporter,
) -> Result<JudgeStats> {
    let start = Instant::now();
    let mut stats = JudgeStats::default();

    for dir in store.model_dirs()? {
        let files = ResultStore::record_files(&dir.path)?;
        progress.on_model_start(Stage::Judge, &dir.name, files.len());

        for path in files {
            let mut record = match ResultStore::load(&path) {
                Ok(record) => record,
                Err(e) => {
                    tracing::warn!("skipping unreadable record: {e:#}");
                    stats.unreadable += 1;
                    let name = path.file_stem().unwrap_or_default().to_string_lossy();
                    progress.on_unit_error(Stage::Judge, &dir.name, &name, &format!("{e:#}"));
                    continue;
                }
            };

            let mut errors = Vec::new();
            for variant in PromptVariant::ALL {
                let current = record.variant(variant);
                if current.is_judged() {
                    stats.already_judged += 1;
                    continue;
                }
                if current.is_failed() || !current.has_response() {
                    stats.skipped += 1;
                    continue;
                }

                match judge.grade(&record, variant).await {
                    Ok((verdict, reply)) => {
                        record.variant_mut(variant).set_verdict(verdict, reply);
                        ResultStore::save_to(&path, &record)?;
                        stats.judged += 1;
                        if verdict == Verdict::Correct {
                            stats.correct += 1;
                        }
                        tracing::debug!(model = %dir.name, word = %record.word, %variant, %verdict, "judged");
                    }
                    Err(e) => {
                        // Bad credentials or an unknown judge model fail every call.
                        if e
                            .downcast_ref::<ProviderError>()
                            .is_some_and(ProviderError::is_permanent)
                        {
                            progress.on_unit_error(
                                Stage::Judge,
                                &dir.name,
                                &record.word,
                                &format!("{e:#}"),
                            );
                            return Err(e.context(format!(
                                "judge model '{}' cannot be used, stopping",
                                judge.model()
                            )));
                        }
                        let detail = format!("{e:#}");
                        tracing::warn!(
                            model = %dir.name,
                            word = %record.word,
                            %variant,
                            "judge call failed: {detail}"
                        );
                        stats.failed += 1;
                        errors.push(format!("{variant}: {detail}"));
                    }
                }
            }

            if errors.is_empty() {
                progress.on_unit_complete(Stage::Judge, &dir.name, &record.word);
            } else {
                progress.on_unit_error(Stage::Judge, &dir.name, &record.word, &errors.join("; "));
            }
        }
    }

    progress.on_stage_complete(Stage::Judge, stats.judged, stats.failed, start.elapsed());
    tracing::info!(
        judge_model = judge.model(),
        judged = stats.judged,
        correct = stats.correct,
        already_judged = stats.already_judged,
        failed = stats.failed,
        "judging finished"
    );

    Ok(stats)
}
