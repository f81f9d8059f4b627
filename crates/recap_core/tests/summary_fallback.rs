use chrono::{NaiveDate, NaiveDateTime};
use recap_core::{
    basic_summary, summarize, EntryRepository, GenerationError, JsonEntryRepository,
    JsonFileStore, SummaryService, SummarySource, SummaryStrategy, TextGenerator,
    NO_ENTRIES_MESSAGE,
};
use std::cell::Cell;

struct ScriptedGenerator {
    reply: Result<String, GenerationError>,
    calls: Cell<usize>,
}

impl ScriptedGenerator {
    fn new(reply: Result<String, GenerationError>) -> Self {
        Self {
            reply,
            calls: Cell::new(0),
        }
    }
}

impl TextGenerator for ScriptedGenerator {
    fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        self.calls.set(self.calls.get() + 1);
        self.reply.clone()
    }
}

fn fixed_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 7)
        .unwrap()
        .and_hms_opt(17, 0, 0)
        .unwrap()
}

fn seeded_store(dir: &tempfile::TempDir) -> JsonFileStore {
    let store = JsonFileStore::new(dir.path().join("data.json"));
    let repo = JsonEntryRepository::with_clock(&store, fixed_now);
    repo.create_entry("Old work", Some("2024-05-30"), Some("09:00"))
        .unwrap();
    repo.create_entry("A", Some("2024-06-03"), Some("09:00"))
        .unwrap();
    repo.create_entry("B", Some("2024-06-03"), Some("14:00"))
        .unwrap();
    repo.create_entry("C", Some("2024-06-05"), Some("10:00"))
        .unwrap();
    store
}

#[test]
fn every_backend_failure_falls_back_to_basic_summary() {
    let dir = tempfile::tempdir().unwrap();
    let store = seeded_store(&dir);
    let entries = JsonEntryRepository::with_clock(&store, fixed_now)
        .this_week(fixed_now().date());
    let expected = basic_summary(&entries);

    let failures = [
        GenerationError::Timeout,
        GenerationError::Status(500),
        GenerationError::MalformedResponse("truncated body".to_string()),
        GenerationError::Transport("connection"),
        GenerationError::EmptyResponse,
    ];
    for failure in failures {
        let generator = ScriptedGenerator::new(Err(failure.clone()));
        let summary = summarize(&entries, SummaryStrategy::Narrative(&generator));
        assert_eq!(summary.text, expected, "failure = {failure:?}");
        assert_eq!(summary.source, SummarySource::Fallback);
        assert_eq!(generator.calls.get(), 1);
    }
}

#[test]
fn successful_backend_text_is_returned_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let store = seeded_store(&dir);
    let entries = JsonEntryRepository::with_clock(&store, fixed_now).list_entries();
    let generator = ScriptedGenerator::new(Ok("## Key Accomplishments\n- shipped\n".to_string()));

    let summary = summarize(&entries, SummaryStrategy::Narrative(&generator));
    assert_eq!(summary.source, SummarySource::Narrative);
    assert_eq!(summary.text, "## Key Accomplishments\n- shipped\n");
}

#[test]
fn deterministic_path_is_pure() {
    let dir = tempfile::tempdir().unwrap();
    let store = seeded_store(&dir);
    let entries = JsonEntryRepository::with_clock(&store, fixed_now).list_entries();

    let first = summarize(&entries, SummaryStrategy::Deterministic);
    let second = summarize(&entries, SummaryStrategy::Deterministic);
    assert_eq!(first, second);
    assert_eq!(first.text, basic_summary(&entries));
    assert_eq!(first.source, SummarySource::Deterministic);
}

#[test]
fn empty_week_yields_no_entries_message() {
    let summary = summarize(&[], SummaryStrategy::Deterministic);
    assert_eq!(summary.text, NO_ENTRIES_MESSAGE);
    assert_eq!(summary.source, SummarySource::Empty);
}

#[test]
fn weekly_summary_uses_only_this_weeks_entries() {
    let dir = tempfile::tempdir().unwrap();
    let store = seeded_store(&dir);
    let service = SummaryService::new(JsonEntryRepository::with_clock(&store, fixed_now));

    let weekly = service.weekly_summary(SummaryStrategy::Deterministic);
    assert_eq!(weekly.monday, NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
    assert_eq!(weekly.entries.len(), 3);
    assert!(weekly
        .summary
        .text
        .starts_with("# Weekly Summary - 3 Work Entries"));
    assert!(weekly.summary.text.contains("- **Days Active:** 2"));
    assert!(weekly
        .summary
        .text
        .contains("- **Average Entries per Day:** 1.5"));
    assert!(weekly
        .summary
        .text
        .contains("- Most productive day: 2024-06-03 (2 entries)"));
    assert!(!weekly.summary.text.contains("Old work"));
}

#[test]
fn summary_document_wraps_fallback_text() {
    let dir = tempfile::tempdir().unwrap();
    let store = seeded_store(&dir);
    let service = SummaryService::new(JsonEntryRepository::with_clock(&store, fixed_now));
    let generator = ScriptedGenerator::new(Err(GenerationError::Status(503)));

    let document = service.weekly_summary_document(SummaryStrategy::Narrative(&generator));
    assert_eq!(document.file_name, "weekly_summary_2024_06_03.md");
    assert_eq!(document.source, SummarySource::Fallback);
    assert!(document
        .content
        .starts_with("# Weekly Summary - Week of June 03, 2024\n\nGenerated on: 2024-06-07 at 17:00\n\n"));
    assert!(document.content.ends_with("---\nGenerated by Recap.AI\n"));
}

#[test]
fn range_export_round_trips_through_store_format() {
    let dir = tempfile::tempdir().unwrap();
    let store = seeded_store(&dir);
    let service = SummaryService::new(JsonEntryRepository::with_clock(&store, fixed_now));

    let export = service
        .export_range("2024-06-01", "2024-06-30", Some("b"))
        .unwrap();
    assert_eq!(export.count, 1);
    assert_eq!(
        export.file_name,
        "recap_ai_filtered_2024-06-01_2024-06-30.json"
    );

    let exported_path = dir.path().join(&export.file_name);
    std::fs::write(&exported_path, &export.content).unwrap();
    let reread = JsonFileStore::new(&exported_path).load();
    assert_eq!(reread.work_logs.len(), 1);
    assert_eq!(reread.work_logs[0].work, "B");
}

#[test]
fn stats_reflect_whole_log() {
    let dir = tempfile::tempdir().unwrap();
    let store = seeded_store(&dir);
    let service = SummaryService::new(JsonEntryRepository::with_clock(&store, fixed_now));

    let stats = service.stats();
    assert_eq!(stats.total, 4);
    assert_eq!(stats.this_week, 3);
    assert_eq!(stats.logging_since.as_deref(), Some("2024-05-30"));
}
