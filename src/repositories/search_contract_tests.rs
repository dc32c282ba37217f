// src/repositories/search_contract_tests.rs
//
// Search contract shared by every repository: the SQLite stores must return
// the same pages as the in-memory engine for the same data and params.

#[cfg(test)]
mod search_contract {
    use std::fmt::Debug;
    use std::sync::Arc;

    use chrono::{DateTime, Duration, TimeZone, Utc};

    use crate::db::{create_test_pool, initialize_database};
    use crate::domain::{
        CastMember, CastMemberFilter, Category, CategoryFilter, SearchParams, SearchResult,
        SortDirection,
    };
    use crate::error::AppResult;
    use crate::repositories::{
        CastMemberRepository, CategoryRepository, InMemoryCastMemberRepository,
        InMemoryCategoryRepository, SqliteCastMemberRepository, SqliteCategoryRepository,
        SqliteUnitOfWork,
    };

    fn sqlite_uow() -> Arc<SqliteUnitOfWork> {
        let pool = create_test_pool().unwrap();
        initialize_database(&pool.get().unwrap()).unwrap();
        Arc::new(SqliteUnitOfWork::new(Arc::new(pool)))
    }

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn assert_same_pages<F, E>(
        cases: &[SearchParams<F>],
        in_memory: impl Fn(&SearchParams<F>) -> AppResult<SearchResult<E>>,
        sqlite: impl Fn(&SearchParams<F>) -> AppResult<SearchResult<E>>,
    ) where
        F: Debug,
        E: Debug + PartialEq,
    {
        for params in cases {
            let expected = in_memory(params).unwrap();
            let actual = sqlite(params).unwrap();
            assert_eq!(actual.items, expected.items, "items for {params:?}");
            assert_eq!(actual.total, expected.total, "total for {params:?}");
            assert_eq!(actual.last_page, expected.last_page, "last_page for {params:?}");
        }
    }

    /// Duplicate names and timestamps exercise tie-breaking; accented names
    /// exercise case folding beyond ASCII
    fn categories() -> Vec<Category> {
        let at = |seconds: i64| base() + Duration::seconds(seconds);
        vec![
            Category::fake().with_name("ÉCOLE").with_created_at(at(0)).build(),
            Category::fake().with_name("Drama").with_created_at(at(1)).build(),
            Category::fake().with_name("école primaire").with_created_at(at(1)).build(),
            Category::fake().with_name("Ação").with_created_at(at(2)).build(),
            Category::fake().with_name("Drama").with_created_at(at(1)).build(),
            Category::fake().with_name("acao").with_created_at(at(3)).build(),
        ]
    }

    #[test]
    fn test_category_search_contract() {
        let data = categories();
        let memory = InMemoryCategoryRepository::with_items(data.clone());
        let sqlite = SqliteCategoryRepository::new(sqlite_uow());
        sqlite.bulk_insert(&data).unwrap();

        let filter = |name: &str| -> CategoryFilter { name.to_string() };
        let cases: Vec<SearchParams<CategoryFilter>> = vec![
            // no filter, insertion order
            SearchParams::new(),
            SearchParams::new().with_per_page(4).with_page(2),
            // filters, including non-ASCII folding
            SearchParams::new().with_filter(filter("école")),
            SearchParams::new().with_filter(filter("ÉCOLE")).with_per_page(1).with_page(2),
            SearchParams::new().with_filter(filter("AÇÃO")),
            SearchParams::new().with_filter(filter("nothing")),
            // unknown sort field falls back to insertion order
            SearchParams::new().with_sort("secret").with_sort_dir(SortDirection::Desc),
            // ties keep insertion order in both directions
            SearchParams::new().with_sort("name"),
            SearchParams::new().with_sort("name").with_sort_dir(SortDirection::Desc),
            SearchParams::new().with_sort("created_at").with_sort_dir(SortDirection::Desc),
            // pages past the end, including offsets beyond SQLite's integers
            SearchParams::new().with_page(50),
            SearchParams::new().with_page(i64::MAX as usize).with_per_page(1),
            SearchParams::new().with_page(usize::MAX / 2).with_per_page(2),
            SearchParams::new().with_page(usize::MAX).with_per_page(2),
        ];

        assert_same_pages(&cases, |p| memory.search(p), |p| sqlite.search(p));
    }

    #[test]
    fn test_page_beyond_integer_range_is_empty() {
        let sqlite = SqliteCategoryRepository::new(sqlite_uow());
        sqlite.bulk_insert(&Category::fake().build_many(3)).unwrap();

        let params: SearchParams<CategoryFilter> =
            SearchParams::new().with_page(usize::MAX).with_per_page(2);
        let result = sqlite.search(&params).unwrap();

        assert!(result.items.is_empty());
        assert_eq!(result.total, 3);
        assert_eq!(result.last_page, 2);
    }

    #[test]
    fn test_name_filter_folds_non_ascii_case() {
        let ecole = Category::fake().with_name("ÉCOLE").build();
        let memory = InMemoryCategoryRepository::with_items(vec![ecole.clone()]);
        let sqlite = SqliteCategoryRepository::new(sqlite_uow());
        sqlite.insert(&ecole).unwrap();

        let params = SearchParams::new().with_filter("école".to_string());

        assert_eq!(memory.search(&params).unwrap().total, 1);
        assert_eq!(sqlite.search(&params).unwrap().total, 1);
    }

    #[test]
    fn test_cast_member_search_contract_with_default_sort() {
        let at = |seconds: i64| base() + Duration::seconds(seconds);
        let data = vec![
            CastMember::fake().with_name("Ána").with_created_at(at(0)).build(),
            CastMember::fake().with_name("Bruno").director().with_created_at(at(1)).build(),
            CastMember::fake().with_name("ana maria").with_created_at(at(1)).build(),
            CastMember::fake().with_name("Carla").director().with_created_at(at(1)).build(),
            CastMember::fake().with_name("Dário").with_created_at(at(2)).build(),
        ];
        let memory = InMemoryCastMemberRepository::with_items(data.clone());
        let sqlite = SqliteCastMemberRepository::new(sqlite_uow());
        sqlite.bulk_insert(&data).unwrap();

        let by_name = |name: &str| CastMemberFilter {
            name: Some(name.to_string()),
            cast_member_type: None,
        };
        let cases: Vec<SearchParams<CastMemberFilter>> = vec![
            // default sort (created_at desc) with ties on the same second
            SearchParams::new(),
            SearchParams::new().with_per_page(2).with_page(2),
            SearchParams::new().with_filter(by_name("ÁNA")),
            SearchParams::new().with_filter(by_name("dá")),
            SearchParams::new().with_sort("secret"),
            SearchParams::new().with_sort("created_at"),
            SearchParams::new().with_page(4).with_per_page(2),
            SearchParams::new().with_page(usize::MAX),
        ];

        assert_same_pages(&cases, |p| memory.search(p), |p| sqlite.search(p));
    }
}
