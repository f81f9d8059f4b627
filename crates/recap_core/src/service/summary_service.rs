//! Weekly summary, export, and statistics use cases.
//!
//! # Invariants
//! - Summaries never fail; only range validation and JSON encoding can.
//! - Nothing here writes to the store.

use crate::model::entry::{Entry, EntryValidationError};
use crate::repo::entry_repo::EntryRepository;
use crate::search::filter::{monday_of, search_entries};
use crate::service::entry_service::validate_range;
use crate::summary::export::{
    export_entries_json, export_file_name, render_summary_document, summary_file_name,
};
use crate::summary::narrative::{summarize, Summary, SummarySource, SummaryStrategy};
use crate::summary::stats::LogStats;
use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum SummaryServiceError {
    Validation(EntryValidationError),
    Encode(serde_json::Error),
}

impl Display for SummaryServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode export: {err}"),
        }
    }
}

impl Error for SummaryServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<EntryValidationError> for SummaryServiceError {
    fn from(value: EntryValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<serde_json::Error> for SummaryServiceError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Summary of the current week plus the entries it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklySummary {
    pub monday: NaiveDate,
    pub entries: Vec<Entry>,
    pub summary: Summary,
}

/// Markdown document ready to be written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryDocument {
    pub file_name: String,
    pub content: String,
    pub source: SummarySource,
}

/// JSON export of a filtered date range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeExport {
    pub file_name: String,
    pub content: String,
    pub count: usize,
}

pub struct SummaryService<R: EntryRepository> {
    repo: R,
}

impl<R: EntryRepository> SummaryService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Summarizes entries dated in the current week.
    pub fn weekly_summary(&self, strategy: SummaryStrategy<'_>) -> WeeklySummary {
        let today = self.repo.now().date();
        let entries = self.repo.this_week(today);
        let summary = summarize(&entries, strategy);
        WeeklySummary {
            monday: monday_of(today),
            entries,
            summary,
        }
    }

    /// Renders the weekly summary as a downloadable markdown document.
    pub fn weekly_summary_document(&self, strategy: SummaryStrategy<'_>) -> SummaryDocument {
        let weekly = self.weekly_summary(strategy);
        SummaryDocument {
            file_name: summary_file_name(weekly.monday),
            content: render_summary_document(
                &weekly.summary.text,
                weekly.monday,
                self.repo.now(),
            ),
            source: weekly.summary.source,
        }
    }

    /// Exports entries in `[start, end]`, optionally narrowed by keyword.
    ///
    /// Entries keep insertion order.
    pub fn export_range(
        &self,
        start: &str,
        end: &str,
        term: Option<&str>,
    ) -> Result<RangeExport, SummaryServiceError> {
        let (start, end) = validate_range(start, end)?;
        let mut entries = self.repo.in_range(&start, &end);
        if let Some(term) = term {
            entries = search_entries(&entries, term);
        }

        Ok(RangeExport {
            file_name: export_file_name(&start, &end),
            content: export_entries_json(&entries)?,
            count: entries.len(),
        })
    }

    pub fn stats(&self) -> LogStats {
        LogStats::compute(&self.repo.list_entries(), self.repo.now().date())
    }
}
