//! The `palabras summarize` command.

use anyhow::Result;

use palabras_core::summary::build_summary;
use palabras_report::table::render_table;

use super::{result_store, CommonArgs};

pub fn execute(common: CommonArgs) -> Result<()> {
    let config = common.load_config()?;
    let summary = build_summary(&result_store(&config))?;
    summary.save_json(&config.summary_file)?;

    println!("{}", render_table(&summary));
    eprintln!("Summary saved to: {}", config.summary_file.display());
    Ok(())
}
