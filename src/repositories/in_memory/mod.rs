// src/repositories/in_memory/mod.rs
//
// In-memory repositories. Each one is the shared searchable store behind the
// aggregate's repository trait; they back tests and the reference search.

pub mod searchable;

pub use searchable::{apply_filter, apply_paginate, apply_sort, search_items, InMemorySearchable};

use crate::domain::{
    CastMember, CastMemberFilter, CastMemberId, Category, CategoryFilter, CategoryId, Genre,
    GenreFilter, GenreId, SearchParams, SearchResult, Video, VideoFilter, VideoId,
};
use crate::error::AppResult;
use crate::repositories::{
    CastMemberRepository, CategoryRepository, ExistsResult, GenreRepository, VideoRepository,
};

macro_rules! in_memory_repository {
    ($name:ident, $trait:ident, $entity:ty, $id:ty, $filter:ty) => {
        #[derive(Debug, Default)]
        pub struct $name {
            store: InMemorySearchable<$entity>,
        }

        impl $name {
            pub fn new() -> Self {
                Self::default()
            }

            pub fn with_items(items: Vec<$entity>) -> Self {
                Self {
                    store: InMemorySearchable::with_items(items),
                }
            }

            /// Everything stored, in insertion order
            pub fn items(&self) -> Vec<$entity> {
                self.store.items()
            }
        }

        impl $trait for $name {
            fn insert(&self, entity: &$entity) -> AppResult<()> {
                self.store.insert(entity)
            }

            fn bulk_insert(&self, entities: &[$entity]) -> AppResult<()> {
                self.store.bulk_insert(entities)
            }

            fn update(&self, entity: &$entity) -> AppResult<()> {
                self.store.update(entity)
            }

            fn delete(&self, id: &$id) -> AppResult<()> {
                self.store.delete(id)
            }

            fn find_by_id(&self, id: &$id) -> AppResult<Option<$entity>> {
                self.store.find_by_id(id)
            }

            fn find_all(&self) -> AppResult<Vec<$entity>> {
                self.store.find_all()
            }

            fn find_by_ids(&self, ids: &[$id]) -> AppResult<Vec<$entity>> {
                self.store.find_by_ids(ids)
            }

            fn exists_by_id(&self, ids: &[$id]) -> AppResult<ExistsResult<$id>> {
                self.store.exists_by_id(ids)
            }

            fn search(&self, params: &SearchParams<$filter>) -> AppResult<SearchResult<$entity>> {
                self.store.search(params)
            }
        }
    };
}

in_memory_repository!(
    InMemoryCategoryRepository,
    CategoryRepository,
    Category,
    CategoryId,
    CategoryFilter
);
in_memory_repository!(InMemoryGenreRepository, GenreRepository, Genre, GenreId, GenreFilter);
in_memory_repository!(
    InMemoryCastMemberRepository,
    CastMemberRepository,
    CastMember,
    CastMemberId,
    CastMemberFilter
);
in_memory_repository!(InMemoryVideoRepository, VideoRepository, Video, VideoId, VideoFilter);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SortDirection;

    #[test]
    fn test_genre_search_filters_by_category_and_sorts_by_default() {
        let action = CategoryId::new();
        let older = Genre::fake()
            .with_name("Older")
            .add_category_id(action)
            .build();
        let newer = Genre::fake()
            .with_name("Newer")
            .add_category_id(action)
            .with_created_at(older.created_at + chrono::Duration::seconds(10))
            .build();
        let other = Genre::fake().with_name("Other").build();
        let repo = InMemoryGenreRepository::with_items(vec![older.clone(), newer.clone(), other]);

        let result = repo
            .search(&SearchParams::new().with_filter(GenreFilter {
                name: None,
                categories_id: Some(vec![action]),
            }))
            .unwrap();

        assert_eq!(result.total, 2);
        assert_eq!(result.items, vec![newer, older]);
    }

    #[test]
    fn test_video_search_by_title_sorted() {
        let repo = InMemoryVideoRepository::new();
        repo.bulk_insert(&[
            Video::fake().with_title("The Matrix").build(),
            Video::fake().with_title("matrix reloaded").build(),
            Video::fake().with_title("Heat").build(),
        ])
        .unwrap();

        let result = repo
            .search(
                &SearchParams::new()
                    .with_filter(VideoFilter {
                        title: Some("MATRIX".into()),
                        ..Default::default()
                    })
                    .with_sort("title")
                    .with_sort_dir(SortDirection::Asc),
            )
            .unwrap();

        let titles: Vec<_> = result.items.iter().map(|v| v.title.as_str()).collect();
        assert_eq!(titles, vec!["The Matrix", "matrix reloaded"]);
    }
}
