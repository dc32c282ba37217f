//! Critical Genre Invariants:
//!
//! 1. Name is required and at most 255 characters
//! 2. A genre is filed under at least one category once created
//! 3. Category ids are validated for existence before reaching the genre
//! 4. `sync_categories_id` replaces the whole set, it never merges

pub mod entity;
#[cfg(test)]
pub mod fake;
pub mod invariants;

pub use entity::{Genre, GenreCreateCommand, GenreFilter, GenreId};
pub use invariants::{validate_genre, GenreValidator};
