// src/repositories/category_repository.rs
//
// Category persistence

use std::sync::Arc;

use log::debug;
use rusqlite::{params, Connection, Row};

use crate::domain::{
    Category, CategoryFilter, CategoryId, DomainError, SearchParams, SearchResult, Searchable,
};
use crate::error::{AppError, AppResult};
use crate::repositories::sql::{self, WhereClause};
use crate::repositories::unit_of_work::SqliteUnitOfWork;
use crate::repositories::ExistsResult;

#[cfg_attr(test, mockall::automock)]
pub trait CategoryRepository: Send + Sync {
    fn insert(&self, category: &Category) -> AppResult<()>;
    fn bulk_insert(&self, categories: &[Category]) -> AppResult<()>;
    fn update(&self, category: &Category) -> AppResult<()>;
    fn delete(&self, id: &CategoryId) -> AppResult<()>;
    fn find_by_id(&self, id: &CategoryId) -> AppResult<Option<Category>>;
    fn find_all(&self) -> AppResult<Vec<Category>>;
    fn find_by_ids(&self, ids: &[CategoryId]) -> AppResult<Vec<Category>>;
    fn exists_by_id(&self, ids: &[CategoryId]) -> AppResult<ExistsResult<CategoryId>>;
    fn search(&self, params: &SearchParams<CategoryFilter>) -> AppResult<SearchResult<Category>>;
    fn sortable_fields(&self) -> &'static [&'static str] {
        Category::SORTABLE_FIELDS
    }
}

const SELECT_CATEGORY: &str =
    "SELECT category_id, name, description, is_active, created_at FROM categories";

pub struct SqliteCategoryRepository {
    uow: Arc<SqliteUnitOfWork>,
}

impl SqliteCategoryRepository {
    pub fn new(uow: Arc<SqliteUnitOfWork>) -> Self {
        Self { uow }
    }

    fn row_to_category(row: &Row) -> rusqlite::Result<Category> {
        let id: String = row.get("category_id")?;
        let created_at: String = row.get("created_at")?;

        Ok(Category::restore(
            sql::parse_id(&id)?,
            row.get("name")?,
            row.get("description")?,
            row.get("is_active")?,
            sql::parse_timestamp(&created_at)?,
        ))
    }

    fn insert_with(conn: &Connection, category: &Category) -> AppResult<()> {
        conn.execute(
            "INSERT INTO categories (category_id, name, description, is_active, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                category.category_id.to_string(),
                category.name,
                category.description,
                category.is_active,
                sql::format_timestamp(&category.created_at),
            ],
        )?;
        Ok(())
    }
}

impl CategoryRepository for SqliteCategoryRepository {
    fn insert(&self, category: &Category) -> AppResult<()> {
        self.uow
            .with_connection(|conn| Self::insert_with(conn, category))
    }

    fn bulk_insert(&self, categories: &[Category]) -> AppResult<()> {
        self.uow.with_connection(|conn| {
            for category in categories {
                Self::insert_with(conn, category)?;
            }
            Ok(())
        })
    }

    fn update(&self, category: &Category) -> AppResult<()> {
        let changed = self.uow.with_connection(|conn| {
            Ok(conn.execute(
                "UPDATE categories SET name = ?2, description = ?3, is_active = ?4
                 WHERE category_id = ?1",
                params![
                    category.category_id.to_string(),
                    category.name,
                    category.description,
                    category.is_active,
                ],
            )?)
        })?;

        if changed == 0 {
            return Err(AppError::not_found(category.category_id, "Category"));
        }
        Ok(())
    }

    fn delete(&self, id: &CategoryId) -> AppResult<()> {
        let changed = self.uow.with_connection(|conn| {
            conn.execute(
                "DELETE FROM categories WHERE category_id = ?1",
                [id.to_string()],
            )
            .map_err(|e| {
                if sql::is_foreign_key_violation(&e) {
                    AppError::Domain(DomainError::InvalidStateTransition(format!(
                        "Category {} is still linked to a genre",
                        id
                    )))
                } else {
                    AppError::Database(e)
                }
            })
        })?;

        if changed == 0 {
            return Err(AppError::not_found(id, "Category"));
        }
        Ok(())
    }

    fn find_by_id(&self, id: &CategoryId) -> AppResult<Option<Category>> {
        self.uow.with_connection(|conn| {
            let mut stmt = conn.prepare(&format!("{SELECT_CATEGORY} WHERE category_id = ?1"))?;
            match stmt.query_row([id.to_string()], Self::row_to_category) {
                Ok(category) => Ok(Some(category)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(AppError::Database(e)),
            }
        })
    }

    fn find_all(&self) -> AppResult<Vec<Category>> {
        self.uow.with_connection(|conn| {
            let mut stmt = conn.prepare(&format!("{SELECT_CATEGORY} ORDER BY rowid ASC"))?;
            let categories = stmt
                .query_map([], Self::row_to_category)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(categories)
        })
    }

    fn find_by_ids(&self, ids: &[CategoryId]) -> AppResult<Vec<Category>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.uow.with_connection(|conn| {
            let mut stmt = conn.prepare(&format!(
                "{SELECT_CATEGORY} WHERE category_id IN ({}) ORDER BY rowid ASC",
                sql::placeholders(ids.len())
            ))?;
            let categories = stmt
                .query_map(
                    rusqlite::params_from_iter(ids.iter().map(|id| id.to_string())),
                    Self::row_to_category,
                )?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(categories)
        })
    }

    fn exists_by_id(&self, ids: &[CategoryId]) -> AppResult<ExistsResult<CategoryId>> {
        self.uow
            .with_connection(|conn| sql::exists_by_id(conn, "categories", "category_id", ids))
    }

    fn search(&self, params: &SearchParams<CategoryFilter>) -> AppResult<SearchResult<Category>> {
        let mut filter = WhereClause::new();
        if let Some(name) = params.filter() {
            filter.contains_ignore_case("name", name);
        }
        let order = sql::order_by::<Category>(params);
        debug!("Searching categories{}{}", filter.sql(), order);

        let (items, total) = self.uow.with_connection(|conn| {
            sql::search_rows(
                conn,
                SELECT_CATEGORY,
                "categories",
                &filter,
                &order,
                params,
                Self::row_to_category,
            )
        })?;

        Ok(SearchResult::new(items, total, params.page(), params.per_page()))
    }
}
