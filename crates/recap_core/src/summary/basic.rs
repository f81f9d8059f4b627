//! Deterministic statistics-and-listing summary.
//!
//! # Invariants
//! - Output depends only on the input entries (no clock, no locale lookups),
//!   so identical input always renders byte-identical text.
//! - Input order does not matter; entries are sorted by `(date, time)` first.
//! - Most-productive-day ties resolve to the earliest date.

use crate::model::entry::Entry;
use crate::search::filter::sort_chronological;
use std::collections::BTreeMap;

/// Fixed result for an empty entry set.
pub const NO_ENTRIES_MESSAGE: &str = "No work logs found for this week.";

const BASIC_SUMMARY_FOOTER: &str =
    "*Note: This is a basic summary. Configure a text-generation API key for narrative summaries.*";

/// Number of entries logged on one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCount {
    pub date: String,
    pub count: usize,
}

/// Aggregates behind the basic summary.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStats {
    pub total: usize,
    pub active_days: usize,
    pub average_per_day: f64,
    /// Ascending by date.
    pub daily_counts: Vec<DayCount>,
    pub first: Entry,
    pub last: Entry,
    pub most_productive: DayCount,
}

/// Computes summary aggregates; `None` for an empty slice.
pub fn compute_stats(entries: &[Entry]) -> Option<SummaryStats> {
    let mut sorted = entries.to_vec();
    sort_chronological(&mut sorted);
    let first = sorted.first()?.clone();
    let last = sorted.last()?.clone();

    let mut per_day: BTreeMap<&str, usize> = BTreeMap::new();
    for entry in &sorted {
        *per_day.entry(entry.date.as_str()).or_insert(0) += 1;
    }
    let daily_counts: Vec<DayCount> = per_day
        .into_iter()
        .map(|(date, count)| DayCount {
            date: date.to_string(),
            count,
        })
        .collect();

    let mut most_productive = daily_counts[0].clone();
    for day in &daily_counts[1..] {
        if day.count > most_productive.count {
            most_productive = day.clone();
        }
    }

    let total = sorted.len();
    let active_days = daily_counts.len();
    Some(SummaryStats {
        total,
        active_days,
        average_per_day: total as f64 / active_days as f64,
        daily_counts,
        first,
        last,
        most_productive,
    })
}

/// Renders the deterministic markdown summary.
///
/// Returns [`NO_ENTRIES_MESSAGE`] when `entries` is empty.
pub fn basic_summary(entries: &[Entry]) -> String {
    let Some(stats) = compute_stats(entries) else {
        return NO_ENTRIES_MESSAGE.to_string();
    };
    let mut sorted = entries.to_vec();
    sort_chronological(&mut sorted);

    let mut out = format!("# Weekly Summary - {} Work Entries\n\n", stats.total);
    out.push_str("## 📊 Overview\n");
    out.push_str(&format!("- **Total Entries:** {}\n", stats.total));
    out.push_str(&format!("- **Days Active:** {}\n", stats.active_days));
    out.push_str(&format!(
        "- **Average Entries per Day:** {:.1}\n",
        stats.average_per_day
    ));

    out.push_str("\n## 📅 Daily Breakdown\n");
    for day in &stats.daily_counts {
        out.push_str(&format!(
            "- **{}:** {} {}\n",
            day_label(&day.date),
            day.count,
            entries_word(day.count)
        ));
    }

    out.push_str("\n## 📝 Work Entries This Week\n");
    for entry in &sorted {
        let weekday = entry
            .parsed_date()
            .map(|date| date.format("%A").to_string())
            .unwrap_or_else(|| entry.date.clone());
        out.push_str(&format!(
            "\n**{} ({}) at {}:**\n{}\n",
            weekday, entry.date, entry.time, entry.work
        ));
    }

    out.push_str("\n## 💡 Summary Statistics\n");
    out.push_str(&format!(
        "- First entry: {} at {}\n",
        stats.first.date, stats.first.time
    ));
    out.push_str(&format!(
        "- Last entry: {} at {}\n",
        stats.last.date, stats.last.time
    ));
    out.push_str(&format!(
        "- Most productive day: {} ({} {})\n",
        stats.most_productive.date,
        stats.most_productive.count,
        entries_word(stats.most_productive.count)
    ));
    out.push_str("\n---\n");
    out.push_str(BASIC_SUMMARY_FOOTER);
    out.push('\n');
    out
}

/// `Monday, June 03` style label; falls back to the raw string.
fn day_label(date: &str) -> String {
    chrono::NaiveDate::parse_from_str(date, crate::model::entry::DATE_FORMAT)
        .map(|parsed| parsed.format("%A, %B %d").to_string())
        .unwrap_or_else(|_| date.to_string())
}

fn entries_word(count: usize) -> &'static str {
    if count == 1 {
        "entry"
    } else {
        "entries"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn entry(id: u64, date: &str, time: &str, work: &str) -> Entry {
        Entry {
            id,
            date: date.to_string(),
            time: time.to_string(),
            work: work.to_string(),
            created_at: NaiveDate::from_ymd_opt(2024, 6, 1)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
            updated_at: None,
        }
    }

    fn week() -> Vec<Entry> {
        vec![
            entry(1, "2024-06-03", "09:00", "A"),
            entry(2, "2024-06-03", "14:00", "B"),
            entry(3, "2024-06-05", "10:00", "C"),
        ]
    }

    #[test]
    fn stats_match_hand_computed_values() {
        let stats = compute_stats(&week()).unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.active_days, 2);
        assert!((stats.average_per_day - 1.5).abs() < f64::EPSILON);
        assert_eq!(stats.most_productive.date, "2024-06-03");
        assert_eq!(stats.most_productive.count, 2);
        assert_eq!(stats.first.id, 1);
        assert_eq!(stats.last.id, 3);
    }

    #[test]
    fn most_productive_tie_resolves_to_earliest_date() {
        let entries = vec![
            entry(1, "2024-06-06", "09:00", "late"),
            entry(2, "2024-06-04", "09:00", "early"),
        ];
        let stats = compute_stats(&entries).unwrap();
        assert_eq!(stats.most_productive.date, "2024-06-04");
    }

    #[test]
    fn empty_input_returns_sentinel() {
        assert!(compute_stats(&[]).is_none());
        assert_eq!(basic_summary(&[]), NO_ENTRIES_MESSAGE);
    }

    #[test]
    fn renders_full_document() {
        let expected = "\
# Weekly Summary - 3 Work Entries

## 📊 Overview
- **Total Entries:** 3
- **Days Active:** 2
- **Average Entries per Day:** 1.5

## 📅 Daily Breakdown
- **Monday, June 03:** 2 entries
- **Wednesday, June 05:** 1 entry

## 📝 Work Entries This Week

**Monday (2024-06-03) at 09:00:**
A

**Monday (2024-06-03) at 14:00:**
B

**Wednesday (2024-06-05) at 10:00:**
C

## 💡 Summary Statistics
- First entry: 2024-06-03 at 09:00
- Last entry: 2024-06-05 at 10:00
- Most productive day: 2024-06-03 (2 entries)

---
*Note: This is a basic summary. Configure a text-generation API key for narrative summaries.*
";
        assert_eq!(basic_summary(&week()), expected);
    }

    #[test]
    fn output_ignores_input_order() {
        let mut shuffled = week();
        shuffled.reverse();
        assert_eq!(basic_summary(&shuffled), basic_summary(&week()));
    }

    #[test]
    fn unparsable_dates_fall_back_to_raw_text() {
        let entries = vec![entry(1, "someday", "09:00", "legacy row")];
        let text = basic_summary(&entries);
        assert!(text.contains("- **someday:** 1 entry"));
        assert!(text.contains("**someday (someday) at 09:00:**"));
    }
}
