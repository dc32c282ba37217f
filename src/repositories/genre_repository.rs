// src/repositories/genre_repository.rs
//
// Genre persistence. Category links live in `genre_categories`.

use std::sync::Arc;

use log::debug;
use rusqlite::{params, Connection, Row};

use crate::domain::{
    CategoryId, Genre, GenreFilter, GenreId, RelatedIds, SearchParams, SearchResult, Searchable,
};
use crate::error::{AppError, AppResult};
use crate::repositories::sql::{self, WhereClause};
use crate::repositories::unit_of_work::SqliteUnitOfWork;
use crate::repositories::ExistsResult;

#[cfg_attr(test, mockall::automock)]
pub trait GenreRepository: Send + Sync {
    fn insert(&self, genre: &Genre) -> AppResult<()>;
    fn bulk_insert(&self, genres: &[Genre]) -> AppResult<()>;
    fn update(&self, genre: &Genre) -> AppResult<()>;
    fn delete(&self, id: &GenreId) -> AppResult<()>;
    fn find_by_id(&self, id: &GenreId) -> AppResult<Option<Genre>>;
    fn find_all(&self) -> AppResult<Vec<Genre>>;
    fn find_by_ids(&self, ids: &[GenreId]) -> AppResult<Vec<Genre>>;
    fn exists_by_id(&self, ids: &[GenreId]) -> AppResult<ExistsResult<GenreId>>;
    fn search(&self, params: &SearchParams<GenreFilter>) -> AppResult<SearchResult<Genre>>;
    fn sortable_fields(&self) -> &'static [&'static str] {
        Genre::SORTABLE_FIELDS
    }
}

const SELECT_GENRE: &str = "SELECT genre_id, name, is_active, created_at FROM genres";

pub struct SqliteGenreRepository {
    uow: Arc<SqliteUnitOfWork>,
}

impl SqliteGenreRepository {
    pub fn new(uow: Arc<SqliteUnitOfWork>) -> Self {
        Self { uow }
    }

    /// Row without its category links; `hydrate` fills them in
    fn row_to_genre(row: &Row) -> rusqlite::Result<Genre> {
        let id: String = row.get("genre_id")?;
        let created_at: String = row.get("created_at")?;

        Ok(Genre::restore(
            sql::parse_id(&id)?,
            row.get("name")?,
            RelatedIds::new(),
            row.get("is_active")?,
            sql::parse_timestamp(&created_at)?,
        ))
    }

    fn hydrate(conn: &Connection, mut genre: Genre) -> AppResult<Genre> {
        genre.categories_id = sql::load_related::<CategoryId>(
            conn,
            "genre_categories",
            "genre_id",
            &genre.genre_id.to_string(),
            "category_id",
        )?;
        Ok(genre)
    }

    fn hydrate_all(conn: &Connection, genres: Vec<Genre>) -> AppResult<Vec<Genre>> {
        genres
            .into_iter()
            .map(|genre| Self::hydrate(conn, genre))
            .collect()
    }

    fn save_categories(conn: &Connection, genre: &Genre) -> AppResult<()> {
        sql::replace_related(
            conn,
            "genre_categories",
            "genre_id",
            &genre.genre_id.to_string(),
            "category_id",
            &genre.categories_id,
        )
    }

    fn insert_with(conn: &Connection, genre: &Genre) -> AppResult<()> {
        conn.execute(
            "INSERT INTO genres (genre_id, name, is_active, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                genre.genre_id.to_string(),
                genre.name,
                genre.is_active,
                sql::format_timestamp(&genre.created_at),
            ],
        )?;
        Self::save_categories(conn, genre)
    }
}

impl GenreRepository for SqliteGenreRepository {
    fn insert(&self, genre: &Genre) -> AppResult<()> {
        self.uow.with_connection(|conn| Self::insert_with(conn, genre))
    }

    fn bulk_insert(&self, genres: &[Genre]) -> AppResult<()> {
        self.uow.with_connection(|conn| {
            for genre in genres {
                Self::insert_with(conn, genre)?;
            }
            Ok(())
        })
    }

    fn update(&self, genre: &Genre) -> AppResult<()> {
        self.uow.with_connection(|conn| {
            let changed = conn.execute(
                "UPDATE genres SET name = ?2, is_active = ?3 WHERE genre_id = ?1",
                params![genre.genre_id.to_string(), genre.name, genre.is_active],
            )?;
            if changed == 0 {
                return Err(AppError::not_found(genre.genre_id, "Genre"));
            }
            Self::save_categories(conn, genre)
        })
    }

    fn delete(&self, id: &GenreId) -> AppResult<()> {
        let changed = self.uow.with_connection(|conn| {
            Ok(conn.execute("DELETE FROM genres WHERE genre_id = ?1", [id.to_string()])?)
        })?;

        if changed == 0 {
            return Err(AppError::not_found(id, "Genre"));
        }
        Ok(())
    }

    fn find_by_id(&self, id: &GenreId) -> AppResult<Option<Genre>> {
        self.uow.with_connection(|conn| {
            let mut stmt = conn.prepare(&format!("{SELECT_GENRE} WHERE genre_id = ?1"))?;
            match stmt.query_row([id.to_string()], Self::row_to_genre) {
                Ok(genre) => Ok(Some(Self::hydrate(conn, genre)?)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(AppError::Database(e)),
            }
        })
    }

    fn find_all(&self) -> AppResult<Vec<Genre>> {
        self.uow.with_connection(|conn| {
            let mut stmt = conn.prepare(&format!("{SELECT_GENRE} ORDER BY rowid ASC"))?;
            let genres = stmt
                .query_map([], Self::row_to_genre)?
                .collect::<Result<Vec<_>, _>>()?;
            Self::hydrate_all(conn, genres)
        })
    }

    fn find_by_ids(&self, ids: &[GenreId]) -> AppResult<Vec<Genre>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.uow.with_connection(|conn| {
            let mut stmt = conn.prepare(&format!(
                "{SELECT_GENRE} WHERE genre_id IN ({}) ORDER BY rowid ASC",
                sql::placeholders(ids.len())
            ))?;
            let genres = stmt
                .query_map(
                    rusqlite::params_from_iter(ids.iter().map(|id| id.to_string())),
                    Self::row_to_genre,
                )?
                .collect::<Result<Vec<_>, _>>()?;
            Self::hydrate_all(conn, genres)
        })
    }

    fn exists_by_id(&self, ids: &[GenreId]) -> AppResult<ExistsResult<GenreId>> {
        self.uow
            .with_connection(|conn| sql::exists_by_id(conn, "genres", "genre_id", ids))
    }

    fn search(&self, params: &SearchParams<GenreFilter>) -> AppResult<SearchResult<Genre>> {
        let mut filter = WhereClause::new();
        if let Some(genre_filter) = params.filter() {
            if let Some(name) = &genre_filter.name {
                filter.contains_ignore_case("name", name);
            }
            if let Some(categories_id) = &genre_filter.categories_id {
                filter.related_to_any(
                    "genre_categories",
                    "genre_id",
                    "genres.genre_id",
                    "category_id",
                    categories_id,
                );
            }
        }
        let order = sql::order_by::<Genre>(params);
        debug!("Searching genres{}{}", filter.sql(), order);

        let (items, total) = self.uow.with_connection(|conn| {
            let (rows, total) = sql::search_rows(
                conn,
                SELECT_GENRE,
                "genres",
                &filter,
                &order,
                params,
                Self::row_to_genre,
            )?;
            Ok((Self::hydrate_all(conn, rows)?, total))
        })?;

        Ok(SearchResult::new(items, total, params.page(), params.per_page()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, initialize_database};
    use crate::domain::{Category, DomainError, SortDirection};
    use crate::repositories::{CategoryRepository, InMemoryGenreRepository, SqliteCategoryRepository};
    use chrono::{Duration, TimeZone, Utc};

    struct Fixture {
        categories: SqliteCategoryRepository,
        genres: SqliteGenreRepository,
    }

    fn fixture() -> Fixture {
        let pool = create_test_pool().unwrap();
        initialize_database(&pool.get().unwrap()).unwrap();
        let uow = Arc::new(SqliteUnitOfWork::new(Arc::new(pool)));
        Fixture {
            categories: SqliteCategoryRepository::new(Arc::clone(&uow)),
            genres: SqliteGenreRepository::new(uow),
        }
    }

    #[test]
    fn test_round_trip_with_categories() {
        let f = fixture();
        let categories = Category::fake().build_many(2);
        f.categories.bulk_insert(&categories).unwrap();

        let genre = Genre::fake()
            .add_category_id(categories[0].category_id)
            .add_category_id(categories[1].category_id)
            .build();
        f.genres.insert(&genre).unwrap();

        let found = f.genres.find_by_id(&genre.genre_id).unwrap().unwrap();
        assert_eq!(found, genre);
    }

    #[test]
    fn test_update_syncs_category_links() {
        let f = fixture();
        let categories = Category::fake().build_many(2);
        f.categories.bulk_insert(&categories).unwrap();

        let mut genre = Genre::fake().add_category_id(categories[0].category_id).build();
        f.genres.insert(&genre).unwrap();

        genre.sync_categories_id(vec![categories[1].category_id]);
        genre.change_name("Horror");
        f.genres.update(&genre).unwrap();

        let found = f.genres.find_by_id(&genre.genre_id).unwrap().unwrap();
        assert_eq!(found.name, "Horror");
        assert_eq!(found.categories_id.to_vec(), vec![categories[1].category_id]);
    }

    #[test]
    fn test_linked_category_cannot_be_deleted() {
        let f = fixture();
        let categories = Category::fake().build_many(2);
        f.categories.bulk_insert(&categories).unwrap();
        let genre = Genre::fake().add_category_id(categories[0].category_id).build();
        f.genres.insert(&genre).unwrap();

        let err = f.categories.delete(&categories[0].category_id).unwrap_err();
        assert!(matches!(
            err,
            AppError::Domain(DomainError::InvalidStateTransition(_))
        ));
        let found = f.genres.find_by_id(&genre.genre_id).unwrap().unwrap();
        assert_eq!(found.categories_id.to_vec(), vec![categories[0].category_id]);

        f.categories.delete(&categories[1].category_id).unwrap();
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let f = fixture();
        let err = f.genres.update(&Genre::fake().build()).unwrap_err();
        assert!(err.to_string().starts_with("Genre Not Found using ID"));
    }

    #[test]
    fn test_search_matches_in_memory_engine() {
        let f = fixture();
        let categories = Category::fake().build_many(3);
        f.categories.bulk_insert(&categories).unwrap();
        let [a, b, c] = [
            categories[0].category_id,
            categories[1].category_id,
            categories[2].category_id,
        ];

        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let genres = vec![
            Genre::fake().with_name("Action").add_category_id(a).with_created_at(base).build(),
            Genre::fake()
                .with_name("drama")
                .add_category_id(b)
                .add_category_id(c)
                .with_created_at(base + Duration::seconds(1))
                .build(),
            Genre::fake()
                .with_name("Action Comedy")
                .add_category_id(c)
                .with_created_at(base + Duration::seconds(2))
                .build(),
            Genre::fake()
                .with_name("Animation")
                .add_category_id(a)
                .with_created_at(base + Duration::seconds(2))
                .build(),
        ];
        f.genres.bulk_insert(&genres).unwrap();
        let memory = InMemoryGenreRepository::with_items(genres);

        let cases = vec![
            SearchParams::new(),
            SearchParams::new().with_filter(GenreFilter {
                name: Some("action".into()),
                categories_id: None,
            }),
            SearchParams::new().with_filter(GenreFilter {
                name: None,
                categories_id: Some(vec![c]),
            }),
            SearchParams::new().with_filter(GenreFilter {
                name: Some("a".into()),
                categories_id: Some(vec![a, b]),
            }),
            SearchParams::new().with_filter(GenreFilter {
                name: None,
                categories_id: Some(vec![]),
            }),
            SearchParams::new().with_sort("name").with_sort_dir(SortDirection::Asc).with_per_page(2),
            SearchParams::new().with_sort("created_at").with_page(2).with_per_page(2),
        ];

        for params in cases {
            let expected = memory.search(&params).unwrap();
            let actual = f.genres.search(&params).unwrap();
            assert_eq!(actual, expected, "params: {params:?}");
        }
    }
}
