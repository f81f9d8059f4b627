//! File-backed JSON store.
//!
//! # Responsibility
//! - Read the document fully on every call.
//! - Persist via temp file + rename so the target is replaced in one step.
//!
//! # Invariants
//! - The backing file is created lazily on first save.
//! - Temp files live next to the target so the rename stays on one filesystem.

use super::{StoreError, StoreResult};
use crate::model::entry::WorkLogDocument;
use log::{debug, error, info, warn};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;
use uuid::Uuid;

/// Stateless handle to the JSON document at `path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns whether the backing file currently exists.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Loads the document, treating missing or malformed content as empty.
    ///
    /// # Side effects
    /// - Emits `store_load` logging events; unreadable or malformed files log a warning.
    pub fn load(&self) -> WorkLogDocument {
        match self.read_document() {
            Ok(document) => document,
            Err(err) => {
                warn!(
                    "event=store_load module=store status=error error_code=read_failed error={}",
                    err
                );
                WorkLogDocument::default()
            }
        }
    }

    /// Loads the document ahead of a save.
    ///
    /// Missing or malformed content still reads as empty, but a file that
    /// exists and cannot be read is an error so the save cannot replace it.
    ///
    /// # Errors
    /// - Returns `StoreError::Read` for read failures other than "not found".
    pub fn load_for_write(&self) -> StoreResult<WorkLogDocument> {
        self.read_document().map_err(|source| {
            error!(
                "event=store_load module=store status=error error_code=read_failed mode=write error={}",
                source
            );
            StoreError::Read {
                path: self.path.clone(),
                source,
            }
        })
    }

    fn read_document(&self) -> std::io::Result<WorkLogDocument> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("event=store_load module=store status=ok state=missing");
                return Ok(WorkLogDocument::default());
            }
            Err(err) => return Err(err),
        };

        match serde_json::from_str::<WorkLogDocument>(&raw) {
            Ok(document) => {
                debug!(
                    "event=store_load module=store status=ok entries={}",
                    document.work_logs.len()
                );
                Ok(document)
            }
            Err(err) => {
                warn!(
                    "event=store_load module=store status=error error_code=malformed_document line={} column={}",
                    err.line(),
                    err.column()
                );
                Ok(WorkLogDocument::default())
            }
        }
    }

    /// Replaces the persisted document with `document`.
    ///
    /// # Errors
    /// - Returns `StoreError::Io` when the directory, temp file, or rename fails.
    pub fn save(&self, document: &WorkLogDocument) -> StoreResult<()> {
        let started_at = Instant::now();
        let encoded = serde_json::to_string_pretty(document)?;

        match self.write_replace(encoded.as_bytes()) {
            Ok(()) => {
                info!(
                    "event=store_save module=store status=ok entries={} duration_ms={}",
                    document.work_logs.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=store_save module=store status=error duration_ms={} error_code=write_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    fn write_replace(&self, bytes: &[u8]) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| self.io_error(parent, source))?;
            }
        }

        let temp_path = self.temp_path();
        fs::write(&temp_path, bytes).map_err(|source| self.io_error(&temp_path, source))?;

        if let Err(source) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(self.io_error(&self.path, source));
        }
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "work_logs.json".to_string());
        self.path
            .with_file_name(format!(".{file_name}.{}.tmp", Uuid::new_v4().simple()))
    }

    fn io_error(&self, path: &Path, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
