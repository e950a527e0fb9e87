//! The `palabras report` command.

use std::path::PathBuf;

use anyhow::Result;

use palabras_core::summary::Summary;
use palabras_providers::config::load_config_from;
use palabras_report::markdown::render_markdown;
use palabras_report::table::render_table;

pub fn execute(summary: Option<PathBuf>, format: String, config: Option<PathBuf>) -> Result<()> {
    let path = match summary {
        Some(path) => path,
        None => load_config_from(config.as_deref())?.summary_file,
    };
    let summary = Summary::load_json(&path)?;

    match format.as_str() {
        "markdown" | "md" => print!("{}", render_markdown(&summary)),
        "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
        "table" => println!("{}", render_table(&summary)),
        other => anyhow::bail!("unknown format '{other}' (expected table, markdown or json)"),
    }

    Ok(())
}
