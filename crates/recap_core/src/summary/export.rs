//! Downloadable artifacts: the weekly summary document and filtered JSON.

use crate::model::entry::{Entry, WorkLogDocument};
use chrono::{NaiveDate, NaiveDateTime};

const SUMMARY_ATTRIBUTION: &str = "Generated by Recap.AI";

/// `June 03, 2024` style label for the week starting on `monday`.
pub fn week_label(monday: NaiveDate) -> String {
    monday.format("%B %d, %Y").to_string()
}

pub fn summary_file_name(monday: NaiveDate) -> String {
    format!("weekly_summary_{}.md", monday.format("%Y_%m_%d"))
}

pub fn export_file_name(start: &str, end: &str) -> String {
    format!("recap_ai_filtered_{start}_{end}.json")
}

/// Wraps a summary body with title, generation time, and attribution.
pub fn render_summary_document(
    body: &str,
    monday: NaiveDate,
    generated_at: NaiveDateTime,
) -> String {
    format!(
        "# Weekly Summary - Week of {}\n\nGenerated on: {}\n\n{}\n\n---\n{}\n",
        week_label(monday),
        generated_at.format("%Y-%m-%d at %H:%M"),
        body.trim_end(),
        SUMMARY_ATTRIBUTION
    )
}

/// Serializes entries in the persisted `{ "work_logs": [...] }` envelope.
pub fn export_entries_json(entries: &[Entry]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&WorkLogDocument::new(entries.to_vec()))
}
