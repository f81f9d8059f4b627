//! Pure filters and sort helpers over entry slices.
//!
//! # Invariants
//! - Date comparisons are lexicographic on `YYYY-MM-DD`, which is date order
//!   because the format is fixed-width.
//! - Sorts are stable: entries with equal `(date, time)` keep insertion order.
//! - Filters never reorder their input.

use crate::model::entry::{Entry, DATE_FORMAT};
use chrono::{Datelike, Days, NaiveDate};

/// Monday on or before `day`. Weeks start on Monday.
pub fn monday_of(day: NaiveDate) -> NaiveDate {
    let offset = u64::from(day.weekday().num_days_from_monday());
    day.checked_sub_days(Days::new(offset)).unwrap_or(day)
}

/// Entries dated on or after the Monday of the week containing `now`.
pub fn this_week(entries: &[Entry], now: NaiveDate) -> Vec<Entry> {
    let monday = monday_of(now).format(DATE_FORMAT).to_string();
    entries
        .iter()
        .filter(|entry| entry.date.as_str() >= monday.as_str())
        .cloned()
        .collect()
}

/// Entries with `start <= date <= end`, both bounds inclusive.
pub fn in_range(entries: &[Entry], start: &str, end: &str) -> Vec<Entry> {
    entries
        .iter()
        .filter(|entry| start <= entry.date.as_str() && entry.date.as_str() <= end)
        .cloned()
        .collect()
}

/// Case-insensitive substring match of `term` against `work`.
///
/// A blank term matches everything.
pub fn search_entries(entries: &[Entry], term: &str) -> Vec<Entry> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return entries.to_vec();
    }
    entries
        .iter()
        .filter(|entry| entry.work.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Orders by `(date, time)` ascending.
pub fn sort_chronological(entries: &mut [Entry]) {
    entries.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
}

/// Orders by `(date, time)` descending.
pub fn sort_most_recent_first(entries: &mut [Entry]) {
    entries.sort_by(|a, b| b.sort_key().cmp(&a.sort_key()));
}

/// The `limit` most recent entries, newest first.
pub fn recent(entries: &[Entry], limit: usize) -> Vec<Entry> {
    let mut sorted = entries.to_vec();
    sort_most_recent_first(&mut sorted);
    sorted.truncate(limit);
    sorted
}
