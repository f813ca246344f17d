//! Item and category model.
//!
//! # Responsibility
//! - Define the record stored in every collection.
//! - Map each category to its fixed collection key and singular name.
//!
//! # Invariants
//! - `id` lies in `1..=MAX_ITEM_ID`; `0` is never a valid persisted id.
//! - `text` is stored trimmed and non-empty.
//! - Timestamps use [`TIMESTAMP_FORMAT`], so string order is time order.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Per-category sequential identifier.
pub type ItemId = u64;

/// Largest assignable id; keeps ids representable as signed 64-bit JSON
/// integers and leaves headroom for the next-id counter.
pub const MAX_ITEM_ID: ItemId = i64::MAX as ItemId;

/// Local wall-clock format written to `created_at`/`updated_at`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats a timestamp the way it is persisted.
pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// One of the three fixed item kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Free-form note with a completion checkbox.
    Note,
    /// Contact entry.
    Contact,
    /// Quote entry.
    Quote,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 3] = [Category::Note, Category::Contact, Category::Quote];

    /// Key of the collection inside the persisted `data` object.
    pub fn collection_key(self) -> &'static str {
        match self {
            Self::Note => "notes",
            Self::Contact => "contacts",
            Self::Quote => "quotes",
        }
    }

    /// Singular name used in logs and CLI output.
    pub fn singular(self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Contact => "contact",
            Self::Quote => "quote",
        }
    }

    /// Whether the completion flag carries meaning for this category.
    pub fn tracks_completion(self) -> bool {
        matches!(self, Self::Note)
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Self::Note => 0,
            Self::Contact => 1,
            Self::Quote => 2,
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.singular())
    }
}

/// Returned when a string names no known category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCategoryError(String);

impl Display for ParseCategoryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown category `{}`; expected note|contact|quote",
            self.0
        )
    }
}

impl Error for ParseCategoryError {}

impl FromStr for Category {
    type Err = ParseCategoryError;

    /// Accepts singular or plural names, case-insensitively.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "note" | "notes" => Ok(Self::Note),
            "contact" | "contacts" => Ok(Self::Contact),
            "quote" | "quotes" => Ok(Self::Quote),
            _ => Err(ParseCategoryError(value.to_string())),
        }
    }
}

/// Validation failures for a single persisted item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    /// Ids are assigned from 1.
    ZeroId,
    /// Id exceeds [`MAX_ITEM_ID`].
    IdOutOfRange { id: ItemId },
    /// Text is empty after trimming.
    BlankText { id: ItemId },
    /// `updated_at` sorts before `created_at`.
    TimestampOrder {
        id: ItemId,
        created_at: String,
        updated_at: String,
    },
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroId => write!(f, "item id must be >= 1"),
            Self::IdOutOfRange { id } => write!(f, "item id {id} exceeds {MAX_ITEM_ID}"),
            Self::BlankText { id } => write!(f, "item {id} has blank text"),
            Self::TimestampOrder {
                id,
                created_at,
                updated_at,
            } => write!(
                f,
                "item {id}: updated_at ({updated_at}) must be >= created_at ({created_at})"
            ),
        }
    }
}

impl Error for ItemValidationError {}

/// One entry in a category collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub text: String,
    pub created_at: String,
    pub updated_at: String,
    /// Present for notes only; other categories omit it on the wire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl Item {
    /// Creates a fresh item stamped with `now`.
    ///
    /// `text` is stored as given; callers trim and reject blank input first.
    pub fn new(category: Category, id: ItemId, text: impl Into<String>, now: &str) -> Self {
        Self {
            id,
            text: text.into(),
            created_at: now.to_string(),
            updated_at: now.to_string(),
            completed: category.tracks_completion().then_some(false),
        }
    }

    /// Completion state, treating an absent flag as not completed.
    pub fn is_completed(&self) -> bool {
        self.completed.unwrap_or(false)
    }

    /// Refreshes `updated_at`, never moving it before `created_at`.
    pub fn touch(&mut self, now: &str) {
        self.updated_at = if now < self.created_at.as_str() {
            self.created_at.clone()
        } else {
            now.to_string()
        };
    }

    /// Checks the persisted-state invariants of one item.
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        if self.id == 0 {
            return Err(ItemValidationError::ZeroId);
        }
        if self.id > MAX_ITEM_ID {
            return Err(ItemValidationError::IdOutOfRange { id: self.id });
        }
        if self.text.trim().is_empty() {
            return Err(ItemValidationError::BlankText { id: self.id });
        }
        if self.updated_at < self.created_at {
            return Err(ItemValidationError::TimestampOrder {
                id: self.id,
                created_at: self.created_at.clone(),
                updated_at: self.updated_at.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{format_timestamp, Category, Item, ItemValidationError, MAX_ITEM_ID};
    use chrono::NaiveDate;

    #[test]
    fn category_parses_singular_and_plural_names() {
        assert_eq!("note".parse::<Category>().unwrap(), Category::Note);
        assert_eq!(" Contacts ".parse::<Category>().unwrap(), Category::Contact);
        assert_eq!("QUOTE".parse::<Category>().unwrap(), Category::Quote);
        assert!("task".parse::<Category>().is_err());
    }

    #[test]
    fn only_notes_start_with_completion_flag() {
        let note = Item::new(Category::Note, 1, "buy milk", "2024-01-01 10:00:00");
        let quote = Item::new(Category::Quote, 1, "carpe diem", "2024-01-01 10:00:00");
        assert_eq!(note.completed, Some(false));
        assert_eq!(quote.completed, None);
        assert!(!quote.is_completed());
    }

    #[test]
    fn touch_never_moves_before_created_at() {
        let mut item = Item::new(Category::Note, 1, "x", "2024-05-01 12:00:00");
        item.touch("2024-04-30 09:00:00");
        assert_eq!(item.updated_at, "2024-05-01 12:00:00");
        item.touch("2024-05-02 08:00:00");
        assert_eq!(item.updated_at, "2024-05-02 08:00:00");
    }

    #[test]
    fn validate_rejects_broken_items() {
        let mut item = Item::new(Category::Contact, 0, "Олена", "2024-01-01 00:00:00");
        assert_eq!(item.validate(), Err(ItemValidationError::ZeroId));

        item.id = u64::MAX;
        assert_eq!(
            item.validate(),
            Err(ItemValidationError::IdOutOfRange { id: u64::MAX })
        );
        item.id = MAX_ITEM_ID;
        assert!(item.validate().is_ok());

        item.id = 3;
        item.text = "   ".to_string();
        assert_eq!(
            item.validate(),
            Err(ItemValidationError::BlankText { id: 3 })
        );

        item.text = "Олена".to_string();
        item.updated_at = "2023-12-31 23:59:59".to_string();
        assert!(matches!(
            item.validate(),
            Err(ItemValidationError::TimestampOrder { id: 3, .. })
        ));
    }

    #[test]
    fn timestamp_format_is_fixed_width() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_opt(8, 5, 9)
            .unwrap();
        assert_eq!(format_timestamp(at), "2024-03-07 08:05:09");
    }
}
