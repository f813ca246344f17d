//! Durable mirror of the document.
//!
//! # Responsibility
//! - Define the load/save contract the repository persists through.
//! - Degrade load failures to an empty document instead of propagating them.
//!
//! # Invariants
//! - `save` always writes the full document; there are no delta writes.
//! - A loaded document has passed `Document::validate()`.

use crate::model::document::{Document, DocumentValidationError};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence failure for load or save.
#[derive(Debug)]
pub enum StoreError {
    /// Reading or writing the backing storage failed.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Content is not valid JSON or does not match the expected shape.
    Json(serde_json::Error),
    /// Content parsed but breaks document invariants.
    InvalidData(DocumentValidationError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Json(err) => write!(f, "malformed data file: {err}"),
            Self::InvalidData(err) => write!(f, "invalid persisted data: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json(err) => Some(err),
            Self::InvalidData(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<DocumentValidationError> for StoreError {
    fn from(value: DocumentValidationError) -> Self {
        Self::InvalidData(value)
    }
}

/// Backend the repository loads from and saves to.
pub trait DocumentStore {
    /// Reads the persisted document.
    ///
    /// Returns `Ok(None)` when nothing has been persisted yet.
    fn load(&self) -> StoreResult<Option<Document>>;

    /// Replaces persisted content with `document`.
    fn save(&self, document: &Document) -> StoreResult<()>;
}

/// Loads the document, substituting an empty one on absence or failure.
///
/// The failure, if any, is handed back next to the substituted document so
/// front ends can surface it before the next save overwrites the file.
///
/// # Side effects
/// - Emits `document_load` events.
pub fn load_with_fallback<S: DocumentStore + ?Sized>(
    store: &S,
) -> (Document, Option<StoreError>) {
    match store.load() {
        Ok(Some(document)) => {
            info!(
                "event=document_load module=store status=ok items={}",
                document.total_len()
            );
            (document, None)
        }
        Ok(None) => {
            info!("event=document_load module=store status=skip reason=missing");
            (Document::default(), None)
        }
        Err(err) => {
            error!(
                "event=document_load module=store status=error fallback=empty error={}",
                err
            );
            (Document::default(), Some(err))
        }
    }
}

/// Like [`load_with_fallback`], discarding the failure after logging it.
pub fn load_or_default<S: DocumentStore + ?Sized>(store: &S) -> Document {
    load_with_fallback(store).0
}
