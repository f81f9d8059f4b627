//! Headline numbers about the whole log.

use crate::model::entry::Entry;
use crate::search::filter::this_week;
use chrono::{Datelike, NaiveDate, Weekday};

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogStats {
    pub total: usize,
    pub this_week: usize,
    /// Earliest entry date, if any.
    pub logging_since: Option<String>,
    /// Monday..Sunday order; weekdays without entries are omitted.
    pub by_weekday: Vec<(Weekday, usize)>,
}

impl LogStats {
    pub fn compute(entries: &[Entry], today: NaiveDate) -> Self {
        let mut counts = [0usize; 7];
        for entry in entries {
            if let Some(date) = entry.parsed_date() {
                counts[date.weekday().num_days_from_monday() as usize] += 1;
            }
        }

        Self {
            total: entries.len(),
            this_week: this_week(entries, today).len(),
            logging_since: entries.iter().map(|entry| entry.date.clone()).min(),
            by_weekday: WEEK
                .iter()
                .zip(counts)
                .filter(|(_, count)| *count > 0)
                .map(|(day, count)| (*day, count))
                .collect(),
        }
    }
}
