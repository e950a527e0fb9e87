//! The `palabras judge` command.

use anyhow::Result;

use palabras_core::judge::{run_judging, JudgeStats};

use super::{judge, result_store, CommonArgs, ConsoleReporter};

pub async fn execute(common: CommonArgs) -> Result<JudgeStats> {
    let config = common.load_config()?;
    let judge = judge(&config)?;
    let store = result_store(&config);

    if !store.root().is_dir() {
        tracing::warn!(
            "result store {} does not exist; nothing to judge",
            store.root().display()
        );
    }

    eprintln!("Judging with {}", judge.model());
    let stats = run_judging(&judge, &store, &ConsoleReporter).await?;

    println!(
        "Judged {} variant(s): {} correct, {} already judged, {} without response, {} failed",
        stats.judged, stats.correct, stats.already_judged, stats.skipped, stats.failed,
    );
    if stats.unreadable > 0 {
        println!("{} unreadable record file(s) skipped", stats.unreadable);
    }
    Ok(stats)
}
