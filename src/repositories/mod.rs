// src/repositories/mod.rs
//
// Repository layer
//
// RULES:
// - Repositories are dumb data mappers
// - No business logic, no invariant enforcement
// - No event emission: use cases register aggregates with the unit of work
// - No cross-repository calls
// - Explicit SQL only

pub mod cast_member_repository;
pub mod category_repository;
pub mod genre_repository;
pub mod in_memory;
pub mod sql;
pub mod unit_of_work;
pub mod video_repository;

mod search_contract_tests;

pub use cast_member_repository::{CastMemberRepository, SqliteCastMemberRepository};
pub use category_repository::{CategoryRepository, SqliteCategoryRepository};
pub use genre_repository::{GenreRepository, SqliteGenreRepository};
pub use in_memory::{
    InMemoryCastMemberRepository, InMemoryCategoryRepository, InMemoryGenreRepository,
    InMemorySearchable, InMemoryVideoRepository,
};
pub use unit_of_work::{
    InMemoryUnitOfWork, SqliteUnitOfWork, TrackedAggregate, UnitOfWork,
};
pub use video_repository::{SqliteVideoRepository, VideoRepository};

#[cfg(test)]
pub use cast_member_repository::MockCastMemberRepository;
#[cfg(test)]
pub use category_repository::MockCategoryRepository;
#[cfg(test)]
pub use genre_repository::MockGenreRepository;
#[cfg(test)]
pub use video_repository::MockVideoRepository;

/// Ids split by whether they are stored, each side in input order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistsResult<I> {
    pub exists: Vec<I>,
    pub not_exists: Vec<I>,
}

impl<I> Default for ExistsResult<I> {
    fn default() -> Self {
        Self {
            exists: Vec::new(),
            not_exists: Vec::new(),
        }
    }
}

impl<I> ExistsResult<I> {
    pub fn all_exist(&self) -> bool {
        self.not_exists.is_empty()
    }
}
