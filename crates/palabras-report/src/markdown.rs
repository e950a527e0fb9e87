//! Markdown rendering, for pasting results into issues and READMEs.

use palabras_core::model::PromptVariant;
use palabras_core::summary::Summary;

use crate::{percent, ratio};

/// Render the summary as a GitHub-flavored markdown table.
pub fn render_markdown(summary: &Summary) -> String {
    let mut md = String::new();
    md.push_str("| Model | Prompt A | A % | Prompt B | B % |\n");
    md.push_str("|-------|----------|-----|----------|-----|\n");
    for (model, entry) in &summary.models {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            model.replace('|', "\\|"),
            ratio(entry, PromptVariant::PromptA),
            percent(entry, PromptVariant::PromptA),
            ratio(entry, PromptVariant::PromptB),
            percent(entry, PromptVariant::PromptB),
        ));
    }
    md
}
