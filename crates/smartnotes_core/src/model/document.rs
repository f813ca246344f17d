//! Full persisted state across all categories.
//!
//! # Responsibility
//! - Hold one ordered collection per category as named fields.
//! - Validate loaded state before the repository takes ownership.
//!
//! # Invariants
//! - Collections keep insertion order; removal never reorders survivors.
//! - Ids are unique within each collection.

use crate::model::item::{Category, Item, ItemId, ItemValidationError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation failures for a whole document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentValidationError {
    /// One item violates its own invariants.
    Item {
        category: Category,
        source: ItemValidationError,
    },
    /// Two items in the same category share an id.
    DuplicateId { category: Category, id: ItemId },
}

impl Display for DocumentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Item { category, source } => {
                write!(f, "invalid {} entry: {source}", category.singular())
            }
            Self::DuplicateId { category, id } => {
                write!(f, "duplicate {} id {id}", category.singular())
            }
        }
    }
}

impl Error for DocumentValidationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Item { source, .. } => Some(source),
            Self::DuplicateId { .. } => None,
        }
    }
}

/// Mapping from category to its collection.
///
/// Field names double as the keys of the persisted `data` object. A missing
/// array decodes as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub notes: Vec<Item>,
    #[serde(default)]
    pub contacts: Vec<Item>,
    #[serde(default)]
    pub quotes: Vec<Item>,
}

impl Document {
    /// Read-only view of one collection.
    pub fn collection(&self, category: Category) -> &[Item] {
        match category {
            Category::Note => &self.notes,
            Category::Contact => &self.contacts,
            Category::Quote => &self.quotes,
        }
    }

    /// Mutable access to one collection.
    pub fn collection_mut(&mut self, category: Category) -> &mut Vec<Item> {
        match category {
            Category::Note => &mut self.notes,
            Category::Contact => &mut self.contacts,
            Category::Quote => &mut self.quotes,
        }
    }

    /// Highest id present in `category`, or `0` when empty.
    pub fn max_id(&self, category: Category) -> ItemId {
        self.collection(category)
            .iter()
            .map(|item| item.id)
            .max()
            .unwrap_or(0)
    }

    /// Total number of items across all categories.
    pub fn total_len(&self) -> usize {
        Category::ALL
            .iter()
            .map(|category| self.collection(*category).len())
            .sum()
    }

    /// Returns whether every collection is empty.
    pub fn is_empty(&self) -> bool {
        self.total_len() == 0
    }

    /// Checks per-item invariants and per-category id uniqueness.
    pub fn validate(&self) -> Result<(), DocumentValidationError> {
        for category in Category::ALL {
            let mut seen = HashSet::new();
            for item in self.collection(category) {
                item.validate()
                    .map_err(|source| DocumentValidationError::Item { category, source })?;
                if !seen.insert(item.id) {
                    return Err(DocumentValidationError::DuplicateId {
                        category,
                        id: item.id,
                    });
                }
            }
        }
        Ok(())
    }
}
