//! Entry use-case service.
//!
//! # Responsibility
//! - Act as the validation boundary for raw date/time/work input.
//! - Provide stable CRUD and query entry points for presentation callers.
//!
//! # Invariants
//! - Create rejects dates after today; update does not re-check this.
//! - Listing views are ordered most-recent first unless stated otherwise.

use crate::model::entry::{
    normalize_new_entry_date, normalize_time, normalize_work, parse_entry_date, Entry, EntryId,
    EntryValidationError, DATE_FORMAT,
};
use crate::repo::entry_repo::{EntryRepository, RepoError};
use crate::search::filter::{recent, sort_most_recent_first};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Number of entries shown by the recent-entries view.
pub const RECENT_DEFAULT_LIMIT: usize = 5;

#[derive(Debug)]
pub enum EntryServiceError {
    Validation(EntryValidationError),
    Repo(RepoError),
}

impl Display for EntryServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EntryServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<EntryValidationError> for EntryServiceError {
    fn from(value: EntryValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for EntryServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Candidate set a keyword search runs over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchScope {
    All,
    ThisWeek,
    Range { start: String, end: String },
}

/// Use-case facade over an [`EntryRepository`].
pub struct EntryService<R: EntryRepository> {
    repo: R,
}

impl<R: EntryRepository> EntryService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Validates raw input and appends a new entry.
    ///
    /// Omitted `date`/`time` default to the repository clock.
    pub fn create_entry(
        &self,
        work: &str,
        date: Option<&str>,
        time: Option<&str>,
    ) -> Result<Entry, EntryServiceError> {
        let today = self.repo.now().date();
        let work = normalize_work(work)?;
        let date = date
            .map(|value| normalize_new_entry_date(value, today))
            .transpose()?;
        let time = time.map(normalize_time).transpose()?;

        Ok(self
            .repo
            .create_entry(&work, date.as_deref(), time.as_deref())?)
    }

    /// Validates raw input and fully replaces an entry's editable fields.
    ///
    /// Returns `Ok(false)` when `id` does not exist.
    pub fn update_entry(
        &self,
        id: EntryId,
        work: &str,
        date: &str,
        time: &str,
    ) -> Result<bool, EntryServiceError> {
        let work = normalize_work(work)?;
        let date = parse_entry_date(date)?.format(DATE_FORMAT).to_string();
        let time = normalize_time(time)?;
        Ok(self.repo.update_entry(id, &work, &date, &time)?)
    }

    /// Returns `Ok(false)` when `id` does not exist.
    pub fn delete_entry(&self, id: EntryId) -> Result<bool, EntryServiceError> {
        Ok(self.repo.delete_entry(id)?)
    }

    pub fn get_entry(&self, id: EntryId) -> Option<Entry> {
        self.repo.get_entry(id)
    }

    /// All entries in insertion order.
    pub fn list_entries(&self) -> Vec<Entry> {
        self.repo.list_entries()
    }

    /// All entries, most recent first.
    pub fn list_most_recent_first(&self) -> Vec<Entry> {
        let mut entries = self.repo.list_entries();
        sort_most_recent_first(&mut entries);
        entries
    }

    pub fn recent_entries(&self, limit: usize) -> Vec<Entry> {
        recent(&self.repo.list_entries(), limit)
    }

    /// Entries of the current week in insertion order.
    pub fn this_week(&self) -> Vec<Entry> {
        self.repo.this_week(self.repo.now().date())
    }

    /// Entries between two validated dates, most recent first.
    pub fn in_range(&self, start: &str, end: &str) -> Result<Vec<Entry>, EntryServiceError> {
        let (start, end) = validate_range(start, end)?;
        let mut entries = self.repo.in_range(&start, &end);
        sort_most_recent_first(&mut entries);
        Ok(entries)
    }

    /// Keyword search over `scope`, most recent first.
    pub fn search(&self, term: &str, scope: &SearchScope) -> Result<Vec<Entry>, EntryServiceError> {
        let candidates = match scope {
            SearchScope::All => self.repo.list_entries(),
            SearchScope::ThisWeek => self.this_week(),
            SearchScope::Range { start, end } => {
                let (start, end) = validate_range(start, end)?;
                self.repo.in_range(&start, &end)
            }
        };
        let mut hits = self.repo.search(term, &candidates);
        sort_most_recent_first(&mut hits);
        Ok(hits)
    }
}

/// Parses both bounds and rejects inverted ranges.
pub fn validate_range(start: &str, end: &str) -> Result<(String, String), EntryValidationError> {
    let start = parse_entry_date(start)?;
    let end = parse_entry_date(end)?;
    if start > end {
        return Err(EntryValidationError::InvalidRange {
            start: start.format(DATE_FORMAT).to_string(),
            end: end.format(DATE_FORMAT).to_string(),
        });
    }
    Ok((
        start.format(DATE_FORMAT).to_string(),
        end.format(DATE_FORMAT).to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::validate_range;
    use crate::model::entry::EntryValidationError;

    #[test]
    fn range_rejects_inverted_bounds() {
        assert!(matches!(
            validate_range("2024-06-10", "2024-06-04"),
            Err(EntryValidationError::InvalidRange { .. })
        ));
        assert_eq!(
            validate_range("2024-06-04", "2024-06-04").unwrap(),
            ("2024-06-04".to_string(), "2024-06-04".to_string())
        );
    }
}
