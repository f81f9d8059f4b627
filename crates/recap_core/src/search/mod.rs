//! Entry selection and ordering helpers.
//!
//! # Responsibility
//! - Filter entries by week, date range, and keyword.
//! - Keep chronological ordering rules in one place.

pub mod filter;
