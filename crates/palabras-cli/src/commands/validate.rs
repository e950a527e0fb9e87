//! The `palabras validate` command.

use anyhow::Result;

use palabras_core::loader::{validate_suite, Suite};
use palabras_core::model::PromptVariant;

use super::CommonArgs;

pub fn execute(common: CommonArgs) -> Result<()> {
    let config = common.load_config()?;
    let suite = Suite::load(&config.suite_paths())?;

    println!("Loaded {} vocabulary words", suite.word_count());
    println!(
        "Loaded {} prompts",
        PromptVariant::ALL.len() + suite.prompts.extra_keys().len()
    );
    println!(
        "Loaded {} models ({} active)",
        suite.models.len(),
        suite.active_models().count()
    );

    if let Some(entry) = suite.word(0) {
        println!("\nExample word: {}", entry.word);
        println!("Answer: {}", entry.answer);
        for variant in PromptVariant::ALL {
            println!("{variant}: {}", suite.prompts.render(variant, &entry.word)?);
        }
    }

    println!("\nModels:");
    for model in &suite.models {
        let marker = if model.active { "+" } else { "-" };
        println!("  {marker} {}", model.name);
    }

    let warnings = validate_suite(&suite);
    for w in &warnings {
        let prefix = w
            .word
            .as_ref()
            .map(|word| format!("  [{word}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("\nSuite valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
