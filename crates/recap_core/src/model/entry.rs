//! Work-log entry model.
//!
//! # Responsibility
//! - Define the canonical entry record and its on-disk key names.
//! - Define the `{ "work_logs": [...] }` document envelope.
//! - Provide boundary validation for raw date/time/work input.
//!
//! # Invariants
//! - `id` is never reused within one document.
//! - `created_at` is captured once at creation and never rewritten.
//! - `updated_at` is `None` until the first edit.

use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Positive integer identifier assigned at creation time.
pub type EntryId = u64;

/// Storage and display format for entry dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Storage and display format for entry times.
pub const TIME_FORMAT: &str = "%H:%M";

static DATE_SHAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date regex"));
static TIME_SHAPE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([01]\d|2[0-3]):([0-5]\d)(?::[0-5]\d)?$").expect("valid time regex")
});

/// One dated/timed work-log record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    /// `YYYY-MM-DD`.
    pub date: String,
    /// `HH:MM`, 24-hour clock.
    pub time: String,
    pub work: String,
    /// Serialized as `timestamp` to stay compatible with existing log files.
    #[serde(rename = "timestamp", alias = "created_at")]
    pub created_at: NaiveDateTime,
    #[serde(
        rename = "updated_timestamp",
        alias = "updated_at",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<NaiveDateTime>,
}

impl Entry {
    /// Key used for chronological ordering.
    pub fn sort_key(&self) -> (&str, &str) {
        (self.date.as_str(), self.time.as_str())
    }

    /// Returns whether this entry was edited after creation.
    pub fn is_edited(&self) -> bool {
        self.updated_at.is_some()
    }

    /// Parses `date`, returning `None` for hand-edited or legacy values.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, DATE_FORMAT).ok()
    }
}

/// The single persisted document holding all entries in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkLogDocument {
    #[serde(default)]
    pub work_logs: Vec<Entry>,
    /// Highest id ever assigned in this document, including deleted entries.
    ///
    /// Absent in files written before the counter existed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_id: Option<EntryId>,
}

impl WorkLogDocument {
    pub fn new(work_logs: Vec<Entry>) -> Self {
        Self {
            work_logs,
            last_id: None,
        }
    }

    /// Id the next created entry will receive.
    ///
    /// Documents without a counter fall back to one past the highest surviving id.
    pub fn next_id(&self) -> EntryId {
        let highest_kept = self.work_logs.iter().map(|entry| entry.id).max();
        highest_kept.max(self.last_id).unwrap_or(0) + 1
    }

    /// Reserves the next id and advances the counter.
    pub fn assign_id(&mut self) -> EntryId {
        let id = self.next_id();
        self.last_id = Some(id);
        id
    }

    pub fn position_of(&self, id: EntryId) -> Option<usize> {
        self.work_logs.iter().position(|entry| entry.id == id)
    }
}

/// Validation failures for raw presentation-layer input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValidationError {
    EmptyWork,
    InvalidDate(String),
    InvalidTime(String),
    FutureDate { date: String, today: String },
    InvalidRange { start: String, end: String },
}

impl Display for EntryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyWork => write!(f, "work description cannot be empty"),
            Self::InvalidDate(value) => {
                write!(f, "invalid date `{value}`; expected YYYY-MM-DD")
            }
            Self::InvalidTime(value) => write!(f, "invalid time `{value}`; expected HH:MM"),
            Self::FutureDate { date, today } => {
                write!(f, "date {date} is after today ({today})")
            }
            Self::InvalidRange { start, end } => {
                write!(f, "range start {start} is after range end {end}")
            }
        }
    }
}

impl Error for EntryValidationError {}

/// Trims work text and rejects blank input.
pub fn normalize_work(work: &str) -> Result<String, EntryValidationError> {
    let trimmed = work.trim();
    if trimmed.is_empty() {
        return Err(EntryValidationError::EmptyWork);
    }
    Ok(trimmed.to_string())
}

/// Validates a fixed-width `YYYY-MM-DD` calendar date.
pub fn parse_entry_date(value: &str) -> Result<NaiveDate, EntryValidationError> {
    let trimmed = value.trim();
    if !DATE_SHAPE_RE.is_match(trimmed) {
        return Err(EntryValidationError::InvalidDate(trimmed.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| EntryValidationError::InvalidDate(trimmed.to_string()))
}

/// Validates a date and rejects anything after `today`.
pub fn normalize_new_entry_date(
    value: &str,
    today: NaiveDate,
) -> Result<String, EntryValidationError> {
    let date = parse_entry_date(value)?;
    if date > today {
        return Err(EntryValidationError::FutureDate {
            date: date.format(DATE_FORMAT).to_string(),
            today: today.format(DATE_FORMAT).to_string(),
        });
    }
    Ok(date.format(DATE_FORMAT).to_string())
}

/// Validates a 24-hour time and normalizes `HH:MM:SS` down to `HH:MM`.
pub fn normalize_time(value: &str) -> Result<String, EntryValidationError> {
    let trimmed = value.trim();
    let caps = TIME_SHAPE_RE
        .captures(trimmed)
        .ok_or_else(|| EntryValidationError::InvalidTime(trimmed.to_string()))?;
    Ok(format!("{}:{}", &caps[1], &caps[2]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: EntryId) -> Entry {
        Entry {
            id,
            date: "2024-06-03".to_string(),
            time: "09:00".to_string(),
            work: "write tests".to_string(),
            created_at: NaiveDate::from_ymd_opt(2024, 6, 3)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            updated_at: None,
        }
    }

    #[test]
    fn next_id_skips_past_deleted_slots() {
        let document = WorkLogDocument::new(vec![entry(1), entry(3)]);
        assert_eq!(document.next_id(), 4);
        assert_eq!(WorkLogDocument::default().next_id(), 1);
    }

    #[test]
    fn counter_survives_deleting_the_highest_id() {
        let mut document = WorkLogDocument::default();
        for _ in 0..3 {
            let id = document.assign_id();
            document.work_logs.push(entry(id));
        }
        document.work_logs.retain(|entry| entry.id != 3);

        assert_eq!(document.assign_id(), 4);
        assert_eq!(document.last_id, Some(4));
    }

    #[test]
    fn legacy_document_without_counter_uses_highest_kept_id() {
        let document: WorkLogDocument = serde_json::from_str(
            r#"{"work_logs":[{"id":2,"date":"2024-06-03","time":"09:00","work":"w","timestamp":"2024-06-03T09:00:00"}]}"#,
        )
        .unwrap();
        assert_eq!(document.last_id, None);
        assert_eq!(document.next_id(), 3);
    }

    #[test]
    fn entry_uses_legacy_key_names_on_disk() {
        let json = serde_json::to_value(entry(1)).unwrap();
        assert!(json.get("timestamp").is_some());
        assert!(json.get("updated_timestamp").is_none());
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn entry_accepts_alternate_timestamp_keys() {
        let raw = r#"{
            "id": 7,
            "date": "2024-06-03",
            "time": "09:00",
            "work": "x",
            "created_at": "2024-06-03T09:00:00.123456",
            "updated_at": "2024-06-04T10:00:00"
        }"#;
        let parsed: Entry = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.id, 7);
        assert!(parsed.is_edited());
    }

    #[test]
    fn document_without_work_logs_key_is_empty() {
        let parsed: WorkLogDocument = serde_json::from_str("{}").unwrap();
        assert!(parsed.work_logs.is_empty());
    }

    #[test]
    fn date_validation_requires_fixed_width() {
        assert!(parse_entry_date("2024-6-3").is_err());
        assert!(parse_entry_date("2024-02-30").is_err());
        assert_eq!(
            parse_entry_date(" 2024-02-29 ").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
    }

    #[test]
    fn future_dates_are_rejected_for_new_entries() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();
        assert_eq!(
            normalize_new_entry_date("2024-06-05", today).unwrap(),
            "2024-06-05"
        );
        assert!(matches!(
            normalize_new_entry_date("2024-06-06", today),
            Err(EntryValidationError::FutureDate { .. })
        ));
    }

    #[test]
    fn time_is_normalized_to_hours_and_minutes() {
        assert_eq!(normalize_time("09:30").unwrap(), "09:30");
        assert_eq!(normalize_time("23:59:59").unwrap(), "23:59");
        assert!(normalize_time("24:00").is_err());
        assert!(normalize_time("9:30").is_err());
    }

    #[test]
    fn work_is_trimmed_and_must_not_be_blank() {
        assert_eq!(normalize_work("  shipped it \n").unwrap(), "shipped it");
        assert_eq!(normalize_work(" \t "), Err(EntryValidationError::EmptyWork));
    }
}
