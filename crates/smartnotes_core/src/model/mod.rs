//! Domain model for the three item collections.
//!
//! # Responsibility
//! - Define the canonical shapes persisted to and loaded from the data file.
//! - Resolve categories to collections through a fixed mapping.
//!
//! # Invariants
//! - Item ids are unique per category, never globally.
//! - `updated_at` is never earlier than `created_at`.

pub mod document;
pub mod item;
