//! Critical Category Invariants:
//!
//! 1. Name is required and at most 255 characters
//! 2. A new category is active unless told otherwise
//! 3. Identity and creation timestamp never change
//! 4. Mutations re-validate only the fields they touch

pub mod entity;
#[cfg(test)]
pub mod fake;
pub mod invariants;

pub use entity::{Category, CategoryCreateCommand, CategoryFilter, CategoryId};
pub use invariants::{validate_category, CategoryValidator};
