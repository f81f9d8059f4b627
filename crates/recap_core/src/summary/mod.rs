//! Weekly digest generation.
//!
//! # Responsibility
//! - Turn a set of entries into a human-readable summary.
//! - Own the deterministic and narrative strategies and the fallback between them.
//! - Render export artifacts (summary document, filtered JSON).
//!
//! # Invariants
//! - Empty input yields [`basic::NO_ENTRIES_MESSAGE`], never an error.
//! - Narrative failures are never surfaced; they degrade to the basic summary.
//! - Nothing in this module touches the store.

pub mod basic;
pub mod export;
pub mod gemini;
pub mod narrative;
pub mod stats;
