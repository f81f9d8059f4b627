//! Work-log domain model.
//!
//! # Responsibility
//! - Define the canonical entry record and the persisted document envelope.
//! - Own boundary validation helpers used before input reaches the store.
//!
//! # Invariants
//! - Every entry is identified by a positive `EntryId` unique in its document.
//! - `date` is fixed-width `YYYY-MM-DD`, so string order equals date order.

pub mod entry;
