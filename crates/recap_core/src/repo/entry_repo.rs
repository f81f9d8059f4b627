//! Entry repository contract and JSON-file implementation.
//!
//! # Responsibility
//! - Provide create/list/get/update/delete over the work-log document.
//! - Expose week, range, and keyword queries over the stored entries.
//!
//! # Invariants
//! - Inputs are trusted: callers validate before reaching this layer.
//! - `list_entries` preserves insertion order.
//! - A mutation that matches nothing does not rewrite the document.
//! - Ids come from the document's counter and are never handed out twice.

use crate::model::entry::{Entry, EntryId, DATE_FORMAT, TIME_FORMAT};
use crate::search::filter;
use crate::store::{JsonFileStore, StoreError};
use chrono::{Local, NaiveDate, NaiveDateTime};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Source of "now" for creation defaults and edit stamps.
pub type Clock = fn() -> NaiveDateTime;

/// Wall-clock local time without zone, matching the persisted timestamp shape.
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Repository error for write paths.
#[derive(Debug)]
pub enum RepoError {
    Store(StoreError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Repository interface for work-log entries.
pub trait EntryRepository {
    /// Current local time as seen by this repository.
    fn now(&self) -> NaiveDateTime;

    /// Appends a new entry, defaulting `date`/`time` to now when omitted.
    fn create_entry(&self, work: &str, date: Option<&str>, time: Option<&str>)
        -> RepoResult<Entry>;

    /// Returns all entries in insertion order.
    fn list_entries(&self) -> Vec<Entry>;

    /// Replaces `work`/`date`/`time` and stamps `updated_at`.
    ///
    /// Returns `false` when no entry has `id`.
    fn update_entry(&self, id: EntryId, work: &str, date: &str, time: &str) -> RepoResult<bool>;

    /// Removes the entry with `id`.
    ///
    /// Returns `true` whenever the store file exists, even if no entry has
    /// `id`; returns `false` only when there is no store file yet.
    fn delete_entry(&self, id: EntryId) -> RepoResult<bool>;

    fn get_entry(&self, id: EntryId) -> Option<Entry> {
        self.list_entries().into_iter().find(|entry| entry.id == id)
    }

    /// Entries dated on or after the Monday of the week containing `now`.
    fn this_week(&self, now: NaiveDate) -> Vec<Entry> {
        filter::this_week(&self.list_entries(), now)
    }

    /// Entries with `start <= date <= end`.
    fn in_range(&self, start: &str, end: &str) -> Vec<Entry> {
        filter::in_range(&self.list_entries(), start, end)
    }

    /// Case-insensitive keyword match over an already-selected candidate set.
    fn search(&self, term: &str, within: &[Entry]) -> Vec<Entry> {
        filter::search_entries(within, term)
    }
}

/// Repository over a [`JsonFileStore`].
pub struct JsonEntryRepository<'store> {
    store: &'store JsonFileStore,
    clock: Clock,
}

impl<'store> JsonEntryRepository<'store> {
    pub fn new(store: &'store JsonFileStore) -> Self {
        Self::with_clock(store, local_now)
    }

    /// Constructs a repository with a caller-provided clock.
    pub fn with_clock(store: &'store JsonFileStore, clock: Clock) -> Self {
        Self { store, clock }
    }
}

impl EntryRepository for JsonEntryRepository<'_> {
    fn now(&self) -> NaiveDateTime {
        (self.clock)()
    }

    fn create_entry(
        &self,
        work: &str,
        date: Option<&str>,
        time: Option<&str>,
    ) -> RepoResult<Entry> {
        let now = self.now();
        let mut document = self.store.load_for_write()?;

        let entry = Entry {
            id: document.assign_id(),
            date: date
                .map(str::to_string)
                .unwrap_or_else(|| now.format(DATE_FORMAT).to_string()),
            time: time
                .map(str::to_string)
                .unwrap_or_else(|| now.format(TIME_FORMAT).to_string()),
            work: work.to_string(),
            created_at: now,
            updated_at: None,
        };
        document.work_logs.push(entry.clone());
        self.store.save(&document)?;

        info!(
            "event=entry_create module=repo status=ok id={} date={}",
            entry.id, entry.date
        );
        Ok(entry)
    }

    fn list_entries(&self) -> Vec<Entry> {
        self.store.load().work_logs
    }

    fn update_entry(&self, id: EntryId, work: &str, date: &str, time: &str) -> RepoResult<bool> {
        let mut document = self.store.load_for_write()?;
        let Some(index) = document.position_of(id) else {
            info!("event=entry_update module=repo status=not_found id={id}");
            return Ok(false);
        };

        let entry = &mut document.work_logs[index];
        entry.work = work.to_string();
        entry.date = date.to_string();
        entry.time = time.to_string();
        entry.updated_at = Some(self.now());
        self.store.save(&document)?;

        info!("event=entry_update module=repo status=ok id={id}");
        Ok(true)
    }

    fn delete_entry(&self, id: EntryId) -> RepoResult<bool> {
        let mut document = self.store.load_for_write()?;
        let before = document.work_logs.len();
        document.work_logs.retain(|entry| entry.id != id);

        if document.work_logs.len() == before {
            let store_existed = self.store.exists();
            info!(
                "event=entry_delete module=repo status=not_found id={id} store_existed={store_existed}"
            );
            return Ok(store_existed);
        }

        self.store.save(&document)?;
        info!("event=entry_delete module=repo status=ok id={id}");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::{EntryRepository, JsonEntryRepository};
    use crate::store::JsonFileStore;
    use chrono::{NaiveDate, NaiveDateTime};

    fn fixed_now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 5)
            .unwrap()
            .and_hms_opt(16, 45, 12)
            .unwrap()
    }

    #[test]
    fn create_defaults_date_and_time_from_clock() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("data.json"));
        let repo = JsonEntryRepository::with_clock(&store, fixed_now);

        let entry = repo.create_entry("standup", None, None).unwrap();
        assert_eq!(entry.date, "2024-06-05");
        assert_eq!(entry.time, "16:45");
        assert_eq!(entry.created_at, fixed_now());
        assert!(entry.updated_at.is_none());
    }

    #[test]
    fn no_match_delete_does_not_create_the_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("data.json"));
        let repo = JsonEntryRepository::new(&store);

        assert!(!repo.delete_entry(1).unwrap());
        assert!(!repo.update_entry(1, "x", "2024-06-03", "09:00").unwrap());
        assert!(!store.exists());
    }
}
