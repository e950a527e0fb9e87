//! Console table rendering.

use comfy_table::{Cell, Table};

use palabras_core::model::PromptVariant;
use palabras_core::summary::Summary;

use crate::{percent, ratio};

/// Build a console table with one row per model.
pub fn summary_table(summary: &Summary) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Model", "Prompt A", "A %", "Prompt B", "B %", "Errors"]);

    for (model, entry) in &summary.models {
        let errors = entry.errors(PromptVariant::PromptA) + entry.errors(PromptVariant::PromptB);
        table.add_row(vec![
            Cell::new(model),
            Cell::new(ratio(entry, PromptVariant::PromptA)),
            Cell::new(percent(entry, PromptVariant::PromptA)),
            Cell::new(ratio(entry, PromptVariant::PromptB)),
            Cell::new(percent(entry, PromptVariant::PromptB)),
            Cell::new(errors),
        ]);
    }

    table
}

/// Render the summary table as a string.
pub fn render_table(summary: &Summary) -> String {
    summary_table(summary).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use palabras_core::summary::SummaryEntry;

    #[test]
    fn one_row_per_model() {
        let mut summary = Summary::default();
        summary.models.insert(
            "llama3.1:8b".into(),
            SummaryEntry {
                prompt_a_correct: 7,
                prompt_a_total: 10,
                prompt_b_correct: 4,
                prompt_b_total: 9,
                prompt_b_errors: 1,
                ..Default::default()
            },
        );
        summary
            .models
            .insert("mistral:7b".into(), SummaryEntry::default());

        let table = summary_table(&summary);
        assert_eq!(table.row_iter().count(), 2);

        let text = render_table(&summary);
        assert!(text.contains("llama3.1:8b"));
        assert!(text.contains("7/10"));
        assert!(text.contains("70.0%"));
        assert!(text.contains("4/9"));
        assert!(text.contains("0/0"));
    }
}
