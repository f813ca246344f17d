//! Repository layer owning in-memory state.
//!
//! # Responsibility
//! - Be the single mutation entry point for the document.
//! - Persist through a `DocumentStore` after each mutation or batch.
//!
//! # Invariants
//! - Next-id counters are derived from loaded data, never persisted.
//! - A failed save never rolls back in-memory changes.

pub mod item_repo;
