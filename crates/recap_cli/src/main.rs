//! Recap command-line front end.
//!
//! # Responsibility
//! - Collect raw user input and hand it to `recap_core` services.
//! - Render entries, summaries, and statistics as plain text.
//!
//! # Invariants
//! - Holds no state between invocations; every command re-reads the store.
//! - Only storage write failures and invalid input exit with an error.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::warn;

use recap_core::service::entry_service::RECENT_DEFAULT_LIMIT;
use recap_core::{
    init_logging, Entry, EntryService, GeminiGenerator, JsonEntryRepository, JsonFileStore,
    RecapConfig, SearchScope, SummaryService, SummarySource, SummaryStrategy,
};

/// Daily work logger with weekly summaries
#[derive(Parser, Debug)]
#[command(name = "recap", version)]
#[command(about = "Log daily work and generate weekly summaries", long_about = None)]
struct Cli {
    /// Path to the work log JSON file
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,

    /// Absolute directory for rolling log files
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a work entry
    Add {
        work: String,
        /// YYYY-MM-DD, defaults to today
        #[arg(long)]
        date: Option<String>,
        /// HH:MM, defaults to now
        #[arg(long)]
        time: Option<String>,
    },
    /// List entries, most recent first
    List {
        /// Show only the N most recent entries (5 when N is omitted)
        #[arg(long)]
        recent: Option<Option<usize>>,
    },
    /// Show one entry
    Show { id: u64 },
    /// Replace an entry's work, date and time
    Edit {
        id: u64,
        /// New description; keeps the current one when omitted
        #[arg(long)]
        work: Option<String>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        time: Option<String>,
    },
    /// Delete an entry
    Delete { id: u64 },
    /// Entries logged this week
    Week,
    /// Entries between two dates (inclusive)
    Range {
        start: String,
        end: String,
        #[arg(long)]
        search: Option<String>,
    },
    /// Keyword search across all entries
    Search { term: String },
    /// Generate this week's summary
    Summary {
        /// Skip the text-generation backend
        #[arg(long)]
        basic: bool,
        /// Write the summary document to this file
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Export a date range as JSON
    Export {
        start: String,
        end: String,
        #[arg(long)]
        search: Option<String>,
        /// Output file; defaults to the suggested export file name
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Logging statistics
    Stats,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    if let Some(log_dir) = &config.log_dir {
        if let Err(err) = init_logging(&config.log_level, log_dir) {
            eprintln!("warning: file logging disabled: {err}");
        }
    }

    let store = JsonFileStore::new(&config.data_file);
    run(cli.command, &config, &store)
}

fn resolve_config(cli: &Cli) -> Result<RecapConfig> {
    let mut config = RecapConfig::from_env().context("invalid environment configuration")?;
    if let Some(data_file) = &cli.data_file {
        config.data_file = data_file.clone();
    }
    if let Some(log_dir) = &cli.log_dir {
        config.log_dir = Some(log_dir.clone());
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    Ok(config)
}

fn run(command: Command, config: &RecapConfig, store: &JsonFileStore) -> Result<ExitCode> {
    let entries = EntryService::new(JsonEntryRepository::new(store));

    match command {
        Command::Add { work, date, time } => {
            let entry = entries.create_entry(&work, date.as_deref(), time.as_deref())?;
            println!("Saved entry {} ({} at {}).", entry.id, entry.date, entry.time);
        }
        Command::List { recent } => {
            let listed = match recent {
                Some(limit) => entries.recent_entries(limit.unwrap_or(RECENT_DEFAULT_LIMIT)),
                None => entries.list_most_recent_first(),
            };
            if listed.is_empty() {
                println!("No work entries yet. Add one with `recap add`.");
            } else {
                println!("Total entries: {}", entries.list_entries().len());
                print_entries(&listed);
            }
        }
        Command::Show { id } => match entries.get_entry(id) {
            Some(entry) => print_entry(&entry),
            None => return Ok(not_found(id)),
        },
        Command::Edit {
            id,
            work,
            date,
            time,
        } => {
            let Some(current) = entries.get_entry(id) else {
                return Ok(not_found(id));
            };
            let updated = entries.update_entry(
                id,
                work.as_deref().unwrap_or(current.work.as_str()),
                date.as_deref().unwrap_or(current.date.as_str()),
                time.as_deref().unwrap_or(current.time.as_str()),
            )?;
            if !updated {
                return Ok(not_found(id));
            }
            println!("Entry {id} updated.");
        }
        Command::Delete { id } => {
            if !entries.delete_entry(id)? {
                return Ok(not_found(id));
            }
            println!("Entry {id} deleted.");
        }
        Command::Week => {
            let mut week = entries.this_week();
            recap_core::sort_chronological(&mut week);
            if week.is_empty() {
                println!("No work entries found for this week yet.");
            } else {
                println!("Found {} work entries from this week.", week.len());
                print_entries(&week);
            }
        }
        Command::Range { start, end, search } => {
            let found = match search.as_deref() {
                Some(term) => entries.search(
                    term,
                    &SearchScope::Range {
                        start: start.clone(),
                        end: end.clone(),
                    },
                )?,
                None => entries.in_range(&start, &end)?,
            };
            println!("Showing {} entries from {start} to {end}", found.len());
            print_entries(&found);
        }
        Command::Search { term } => {
            let found = entries.search(&term, &SearchScope::All)?;
            println!("Found {} entries matching '{term}'", found.len());
            print_entries(&found);
        }
        Command::Summary { basic, out } => {
            let summaries = SummaryService::new(JsonEntryRepository::new(store));
            let generator = match (&config.narrative, basic) {
                (Some(narrative), false) => Some(GeminiGenerator::new(narrative.clone())),
                _ => None,
            };
            let strategy = match &generator {
                Some(generator) => SummaryStrategy::Narrative(generator),
                None => SummaryStrategy::Deterministic,
            };

            let document = summaries.weekly_summary_document(strategy);
            if document.source == SummarySource::Fallback {
                warn!("event=summary_cli module=cli status=fallback");
                eprintln!("note: text generation unavailable, showing the basic summary");
            }
            match out {
                Some(path) => {
                    fs::write(&path, &document.content)
                        .with_context(|| format!("failed to write `{}`", path.display()))?;
                    println!("Summary written to {}", path.display());
                }
                None => {
                    println!("{}", document.content);
                    println!("(suggested file name: {})", document.file_name);
                }
            }
        }
        Command::Export {
            start,
            end,
            search,
            out,
        } => {
            let summaries = SummaryService::new(JsonEntryRepository::new(store));
            let export = summaries.export_range(&start, &end, search.as_deref())?;
            let path = out.unwrap_or_else(|| PathBuf::from(&export.file_name));
            fs::write(&path, &export.content)
                .with_context(|| format!("failed to write `{}`", path.display()))?;
            println!("Exported {} entries to {}", export.count, path.display());
        }
        Command::Stats => {
            let summaries = SummaryService::new(JsonEntryRepository::new(store));
            let stats = summaries.stats();
            println!("Total entries: {}", stats.total);
            println!("This week: {}", stats.this_week);
            if let Some(since) = &stats.logging_since {
                println!("Logging since: {since}");
            }
            if !stats.by_weekday.is_empty() {
                println!("Entries by day:");
                for (day, count) in &stats.by_weekday {
                    println!("  {day}: {count}");
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn not_found(id: u64) -> ExitCode {
    eprintln!("No entry with id {id}.");
    ExitCode::FAILURE
}

fn print_entries(entries: &[Entry]) {
    for entry in entries {
        println!();
        print_entry(entry);
    }
}

fn print_entry(entry: &Entry) {
    println!("[{}] {} at {}", entry.id, entry.date, entry.time);
    println!("{}", entry.work);
    if let Some(updated_at) = entry.updated_at {
        println!("(last updated: {})", updated_at.format("%Y-%m-%d %H:%M:%S"));
    }
}
