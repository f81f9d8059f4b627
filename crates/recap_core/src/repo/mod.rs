//! Repository layer over the JSON document store.
//!
//! # Responsibility
//! - Define use-case oriented entry access contracts.
//! - Isolate load/modify/save cycles from service orchestration.
//!
//! # Invariants
//! - Every operation re-reads the store before acting.
//! - Not-found is reported through `Option`/`bool`, never as an error.

pub mod entry_repo;
