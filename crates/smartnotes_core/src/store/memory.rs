//! In-process backend for tests and throwaway sessions.

use super::{DocumentStore, StoreError, StoreResult};
use crate::model::document::Document;
use std::cell::{Cell, RefCell};
use std::io::{Error as IoError, ErrorKind};
use std::path::PathBuf;

/// Store that keeps the last saved document in memory.
///
/// Saves can be forced to fail to exercise the repository's degraded path.
#[derive(Debug, Default)]
pub struct MemoryStore {
    saved: RefCell<Option<Document>>,
    save_count: Cell<usize>,
    fail_saves: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `document`.
    pub fn with_document(document: Document) -> Self {
        Self {
            saved: RefCell::new(Some(document)),
            ..Self::default()
        }
    }

    /// Snapshot of the last successfully saved document.
    pub fn saved(&self) -> Option<Document> {
        self.saved.borrow().clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.save_count.get()
    }

    /// Makes subsequent saves fail (`true`) or succeed again (`false`).
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.set(fail);
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self) -> StoreResult<Option<Document>> {
        let saved = self.saved.borrow().clone();
        if let Some(document) = &saved {
            document.validate()?;
        }
        Ok(saved)
    }

    fn save(&self, document: &Document) -> StoreResult<()> {
        if self.fail_saves.get() {
            return Err(StoreError::Io {
                path: PathBuf::from(":memory:"),
                source: IoError::new(ErrorKind::Other, "memory store rejects saves"),
            });
        }
        *self.saved.borrow_mut() = Some(document.clone());
        self.save_count.set(self.save_count.get() + 1);
        Ok(())
    }
}
