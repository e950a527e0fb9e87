//! palabras-report — rendering of accuracy summaries.
//!
//! Pure presentation: every function here takes a [`Summary`] and returns text.
//!
//! [`Summary`]: palabras_core::summary::Summary

pub mod markdown;
pub mod table;

use palabras_core::model::PromptVariant;
use palabras_core::summary::SummaryEntry;

/// `"{correct}/{total}"` for one variant.
pub fn ratio(entry: &SummaryEntry, variant: PromptVariant) -> String {
    let (correct, total) = entry.counts(variant);
    format!("{correct}/{total}")
}

/// Accuracy as a percentage, or `-` when nothing was counted.
pub fn percent(entry: &SummaryEntry, variant: PromptVariant) -> String {
    entry
        .accuracy(variant)
        .map(|a| format!("{:.1}%", a * 100.0))
        .unwrap_or_else(|| "-".to_string())
}
