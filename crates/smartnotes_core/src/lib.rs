//! Core domain logic for SmartNotes.
//! This crate owns the item collections and their on-disk JSON mirror.

pub mod clock;
pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod store;

pub use clock::{Clock, SteppingClock, SystemClock};
pub use config::{AppConfig, ConfigError, DEFAULT_DATA_FILE};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::document::{Document, DocumentValidationError};
pub use model::item::{
    format_timestamp, Category, Item, ItemId, ItemValidationError, ParseCategoryError,
    MAX_ITEM_ID, TIMESTAMP_FORMAT,
};
pub use repo::item_repo::{Batch, ItemRepository};
pub use store::{
    load_or_default, load_with_fallback, DocumentStore, JsonFileStore, MemoryStore, StoreError,
    StoreResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
