//! JSON file backend.
//!
//! # Responsibility
//! - Read and write the `{ "data": { ... } }` envelope on local disk.
//! - Keep non-ASCII text literal in the written file.
//!
//! # Invariants
//! - Every save rewrites the whole file.
//! - A file without `data` (or with `data: null`) loads as the empty document.

use super::{DocumentStore, StoreError, StoreResult};
use crate::model::document::Document;
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Deserialize)]
struct DocumentFile {
    #[serde(default)]
    data: Option<Document>,
}

#[derive(Serialize)]
struct DocumentFileRef<'a> {
    data: &'a Document,
}

/// File-backed store writing pretty-printed UTF-8 JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn write_document(&self, document: &Document) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
            }
        }

        let mut content = serde_json::to_string_pretty(&DocumentFileRef { data: document })?;
        content.push('\n');
        std::fs::write(&self.path, content).map_err(|err| self.io_error(err))
    }
}

/// Decodes file content into a validated document.
pub(crate) fn decode_document(content: &str) -> StoreResult<Document> {
    let file: DocumentFile = serde_json::from_str(content)?;
    let document = file.data.unwrap_or_default();
    document.validate()?;
    Ok(document)
}

impl DocumentStore for JsonFileStore {
    fn load(&self) -> StoreResult<Option<Document>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(
                    "event=file_read module=store status=skip reason=missing path={}",
                    self.path.display()
                );
                return Ok(None);
            }
            Err(err) => return Err(self.io_error(err)),
        };

        decode_document(&content).map(Some)
    }

    /// Overwrites the backing file, creating parent directories when needed.
    ///
    /// # Side effects
    /// - Emits `document_save` events with duration and status.
    fn save(&self, document: &Document) -> StoreResult<()> {
        let started_at = Instant::now();
        match self.write_document(document) {
            Ok(()) => {
                info!(
                    "event=document_save module=store status=ok items={} duration_ms={}",
                    document.total_len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=document_save module=store status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }
}
