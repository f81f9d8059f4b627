//! Core domain logic for Recap.
//! This crate is the single source of truth for work-log invariants.

pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod store;
pub mod summary;

pub use config::{ConfigError, NarrativeConfig, RecapConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::entry::{Entry, EntryId, EntryValidationError, WorkLogDocument};
pub use repo::entry_repo::{local_now, Clock, EntryRepository, JsonEntryRepository, RepoError, RepoResult};
pub use search::filter::{
    in_range, monday_of, recent, search_entries, sort_chronological, sort_most_recent_first,
    this_week,
};
pub use service::entry_service::{EntryService, EntryServiceError, SearchScope};
pub use service::summary_service::{
    RangeExport, SummaryDocument, SummaryService, SummaryServiceError, WeeklySummary,
};
pub use store::{JsonFileStore, StoreError, StoreResult};
pub use summary::basic::{basic_summary, compute_stats, SummaryStats, NO_ENTRIES_MESSAGE};
pub use summary::gemini::GeminiGenerator;
pub use summary::narrative::{
    build_prompt, summarize, GenerationError, Summary, SummarySource, SummaryStrategy,
    TextGenerator,
};
pub use summary::stats::LogStats;
