//! Strategy selection and narrative generation with mandatory fallback.
//!
//! # Responsibility
//! - Define the text-generation seam ([`TextGenerator`]).
//! - Build the narrative prompt from entries.
//! - Pick a strategy and degrade to the basic summary on any backend failure.
//!
//! # Invariants
//! - [`summarize`] never returns an error.
//! - A failed narrative call yields exactly [`basic_summary`] for the same input.

use crate::model::entry::Entry;
use crate::search::filter::sort_chronological;
use crate::summary::basic::{basic_summary, NO_ENTRIES_MESSAGE};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Failure classes of an external text-generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    Timeout,
    /// Connection, DNS, TLS, or other transport-level failure.
    Transport(&'static str),
    /// Backend answered with a non-success HTTP status.
    Status(u16),
    MalformedResponse(String),
    EmptyResponse,
}

impl GenerationError {
    /// Stable short code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Transport(kind) => kind,
            Self::Status(_) => "http_non_200",
            Self::MalformedResponse(_) => "malformed_response",
            Self::EmptyResponse => "empty_response",
        }
    }
}

impl Display for GenerationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout => write!(f, "text generation timed out"),
            Self::Transport(kind) => write!(f, "text generation transport failure: {kind}"),
            Self::Status(status) => write!(f, "text generation returned HTTP {status}"),
            Self::MalformedResponse(details) => {
                write!(f, "malformed text generation response: {details}")
            }
            Self::EmptyResponse => write!(f, "text generation returned no text"),
        }
    }
}

impl Error for GenerationError {}

/// External text-generation backend.
///
/// Implementations are treated as untrusted and possibly absent.
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// How a summary should be produced.
#[derive(Clone, Copy)]
pub enum SummaryStrategy<'g> {
    Deterministic,
    /// Try the backend first, fall back to the deterministic summary on failure.
    Narrative(&'g dyn TextGenerator),
}

/// Which path produced a [`Summary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummarySource {
    /// Input was empty; text is [`NO_ENTRIES_MESSAGE`].
    Empty,
    Deterministic,
    Narrative,
    /// Narrative was requested but failed.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub text: String,
    pub source: SummarySource,
}

/// Produces a summary for `entries` using `strategy`.
pub fn summarize(entries: &[Entry], strategy: SummaryStrategy<'_>) -> Summary {
    if entries.is_empty() {
        return Summary {
            text: NO_ENTRIES_MESSAGE.to_string(),
            source: SummarySource::Empty,
        };
    }

    let generator = match strategy {
        SummaryStrategy::Deterministic => {
            return Summary {
                text: basic_summary(entries),
                source: SummarySource::Deterministic,
            };
        }
        SummaryStrategy::Narrative(generator) => generator,
    };

    let started_at = Instant::now();
    let prompt = build_prompt(entries);
    let result = generator.generate(&prompt).and_then(|text| {
        if text.trim().is_empty() {
            Err(GenerationError::EmptyResponse)
        } else {
            Ok(text)
        }
    });

    match result {
        Ok(text) => {
            info!(
                "event=summary_generate module=summary status=ok source=narrative entries={} duration_ms={}",
                entries.len(),
                started_at.elapsed().as_millis()
            );
            Summary {
                text,
                source: SummarySource::Narrative,
            }
        }
        Err(err) => {
            warn!(
                "event=summary_generate module=summary status=fallback entries={} duration_ms={} error_code={}",
                entries.len(),
                started_at.elapsed().as_millis(),
                err.code()
            );
            Summary {
                text: basic_summary(entries),
                source: SummarySource::Fallback,
            }
        }
    }
}

/// Builds the narrative prompt; entries are listed chronologically.
pub fn build_prompt(entries: &[Entry]) -> String {
    let mut sorted = entries.to_vec();
    sort_chronological(&mut sorted);

    let mut logs_text = String::new();
    for entry in &sorted {
        logs_text.push_str(&format!(
            "Date: {} at {}\nWork: {}\n\n",
            entry.date, entry.time, entry.work
        ));
    }

    format!(
        "Based on these daily work logs from this week, create a comprehensive weekly summary:\n\
         \n\
         {logs_text}\
         Please create a professional weekly summary that includes:\n\
         \n\
         1. **Key Accomplishments**: What was completed and delivered this week\n\
         2. **Problem Solving**: Specific challenges that were addressed and resolved\n\
         3. **Value Created**: The impact and outcomes of the work done\n\
         4. **Obstacles Faced**: Any difficulties or blockers encountered\n\
         5. **Next Week's Focus**: Suggested priorities and follow-up actions\n\
         \n\
         Format the response with clear headings and bullet points where appropriate.\n\
         Keep it professional but conversational - like you're updating your manager or team.\n\
         Aim for 200-400 words total.\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::cell::RefCell;

    struct RecordingGenerator {
        prompts: RefCell<Vec<String>>,
        reply: Result<String, GenerationError>,
    }

    impl TextGenerator for RecordingGenerator {
        fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
            self.prompts.borrow_mut().push(prompt.to_string());
            self.reply.clone()
        }
    }

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

    #[test]
    fn prompt_lists_entries_chronologically() {
        let prompt = build_prompt(&[
            entry(2, "2024-06-05", "10:00", "second"),
            entry(1, "2024-06-03", "09:00", "first"),
        ]);
        let first = prompt.find("Date: 2024-06-03 at 09:00\nWork: first").unwrap();
        let second = prompt.find("Date: 2024-06-05 at 10:00\nWork: second").unwrap();
        assert!(first < second);
        assert!(prompt.contains("Key Accomplishments"));
        assert!(prompt.contains("Next Week's Focus"));
    }

    #[test]
    fn empty_input_skips_backend() {
        let generator = RecordingGenerator {
            prompts: RefCell::new(Vec::new()),
            reply: Ok("unused".to_string()),
        };
        let summary = summarize(&[], SummaryStrategy::Narrative(&generator));
        assert_eq!(summary.source, SummarySource::Empty);
        assert_eq!(summary.text, NO_ENTRIES_MESSAGE);
        assert!(generator.prompts.borrow().is_empty());
    }

    #[test]
    fn whitespace_reply_counts_as_failure() {
        let entries = vec![entry(1, "2024-06-03", "09:00", "A")];
        let generator = RecordingGenerator {
            prompts: RefCell::new(Vec::new()),
            reply: Ok("  \n ".to_string()),
        };
        let summary = summarize(&entries, SummaryStrategy::Narrative(&generator));
        assert_eq!(summary.source, SummarySource::Fallback);
        assert_eq!(summary.text, basic_summary(&entries));
    }

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(GenerationError::Timeout.code(), "timeout");
        assert_eq!(GenerationError::Status(500).code(), "http_non_200");
        assert_eq!(GenerationError::Transport("dns").code(), "dns");
    }
}
