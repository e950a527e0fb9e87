//! Subcommand implementations and the pieces they share.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Args;

use palabras_core::completion::CompletionClient;
use palabras_core::engine::{ProgressReporter, Stage};
use palabras_core::judge::Judge;
use palabras_core::store::ResultStore;
use palabras_providers::config::load_config_from;
use palabras_providers::{create_provider, HarnessConfig};

pub mod generate;
pub mod init;
pub mod judge;
pub mod list_models;
pub mod report;
pub mod run;
pub mod summarize;
pub mod validate;

/// Options accepted by every pipeline command.
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Config file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Suite directory (overrides config)
    #[arg(long)]
    pub suite_dir: Option<PathBuf>,

    /// Result store directory (overrides config)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Summary file (overrides config)
    #[arg(long)]
    pub summary: Option<PathBuf>,
}

impl CommonArgs {
    /// Load the config and apply command-line overrides.
    pub fn load_config(&self) -> Result<HarnessConfig> {
        let mut config = load_config_from(self.config.as_deref())?;
        if let Some(dir) = &self.suite_dir {
            config.suite_dir = dir.clone();
        }
        if let Some(output) = &self.output {
            config.output_dir = output.clone();
        }
        if let Some(summary) = &self.summary {
            config.summary_file = summary.clone();
        }
        tracing::debug!(?config, "effective config");
        Ok(config)
    }
}

pub fn result_store(config: &HarnessConfig) -> ResultStore {
    ResultStore::new(config.output_dir.clone())
}

/// Completion client for the models under test.
pub fn generation_client(config: &HarnessConfig) -> Result<CompletionClient> {
    let provider = create_provider(&config.generator)?;
    Ok(CompletionClient::new(Arc::from(provider), config.sampling()))
}

/// Completion client bound to the judge model.
pub fn judge(config: &HarnessConfig) -> Result<Judge> {
    let provider = create_provider(&config.judge.provider)?;
    let client = CompletionClient::new(Arc::from(provider), config.sampling());
    Ok(Judge::new(client, config.judge.model.clone()))
}

/// Console progress reporter.
pub struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_model_start(&self, stage: Stage, model: &str, units: usize) {
        eprintln!("[{stage}] {model}: {units} word(s)");
    }

    fn on_unit_complete(&self, stage: Stage, model: &str, word: &str) {
        eprintln!("  [{stage}] {model} :: {word} OK");
    }

    fn on_unit_error(&self, stage: Stage, model: &str, word: &str, error: &str) {
        eprintln!("  [{stage}] {model} :: {word} ERROR: {error}");
    }

    fn on_stage_complete(&self, stage: Stage, completed: usize, failed: usize, elapsed: Duration) {
        eprintln!(
            "[{stage}] complete: {completed} done, {failed} failed ({:.1}s)\n",
            elapsed.as_secs_f64()
        );
    }
}
