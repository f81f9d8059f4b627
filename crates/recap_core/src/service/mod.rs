//! Core use-case services.
//!
//! # Responsibility
//! - Validate raw presentation input before it reaches the repository.
//! - Orchestrate repository queries into summary and export use cases.
//! - Keep CLI/UI layers decoupled from storage details.

pub mod entry_service;
pub mod summary_service;
