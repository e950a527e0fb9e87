//! The `palabras generate` command.

use anyhow::Result;

use palabras_core::engine::{run_generation, GenerationStats};
use palabras_core::loader::Suite;

use super::{generation_client, result_store, CommonArgs, ConsoleReporter};

pub async fn execute(common: CommonArgs) -> Result<GenerationStats> {
    let config = common.load_config()?;
    let suite = Suite::load(&config.suite_paths())?;
    let client = generation_client(&config)?;
    let store = result_store(&config);

    let active = suite.active_models().count();
    eprintln!(
        "palabras v{} — Generating {} words x {} models x 2 prompts via {}",
        env!("CARGO_PKG_VERSION"),
        suite.word_count(),
        active,
        client.provider_name(),
    );

    let stats = run_generation(&client, &suite, &store, &ConsoleReporter).await?;

    println!(
        "Generated {} record(s) for {} model(s) in {} ({} inactive skipped, {} failed variant(s))",
        stats.records,
        stats.models,
        store.root().display(),
        stats.skipped_models,
        stats.failed_variants,
    );
    Ok(stats)
}
