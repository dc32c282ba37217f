// src/repositories/cast_member_repository.rs

use std::sync::Arc;

use log::debug;
use rusqlite::types::Value;
use rusqlite::{params, Connection, Row};

use crate::domain::{
    CastMember, CastMemberFilter, CastMemberId, CastMemberType, SearchParams, SearchResult,
    Searchable,
};
use crate::error::{AppError, AppResult};
use crate::repositories::sql::{self, WhereClause};
use crate::repositories::unit_of_work::SqliteUnitOfWork;
use crate::repositories::ExistsResult;

#[cfg_attr(test, mockall::automock)]
pub trait CastMemberRepository: Send + Sync {
    fn insert(&self, cast_member: &CastMember) -> AppResult<()>;
    fn bulk_insert(&self, cast_members: &[CastMember]) -> AppResult<()>;
    fn update(&self, cast_member: &CastMember) -> AppResult<()>;
    fn delete(&self, id: &CastMemberId) -> AppResult<()>;
    fn find_by_id(&self, id: &CastMemberId) -> AppResult<Option<CastMember>>;
    fn find_all(&self) -> AppResult<Vec<CastMember>>;
    fn find_by_ids(&self, ids: &[CastMemberId]) -> AppResult<Vec<CastMember>>;
    fn exists_by_id(&self, ids: &[CastMemberId]) -> AppResult<ExistsResult<CastMemberId>>;
    fn search(
        &self,
        params: &SearchParams<CastMemberFilter>,
    ) -> AppResult<SearchResult<CastMember>>;
    fn sortable_fields(&self) -> &'static [&'static str] {
        CastMember::SORTABLE_FIELDS
    }
}

const SELECT_CAST_MEMBER: &str =
    "SELECT cast_member_id, name, type, created_at FROM cast_members";

pub struct SqliteCastMemberRepository {
    uow: Arc<SqliteUnitOfWork>,
}

impl SqliteCastMemberRepository {
    pub fn new(uow: Arc<SqliteUnitOfWork>) -> Self {
        Self { uow }
    }

    fn row_to_cast_member(row: &Row) -> rusqlite::Result<CastMember> {
        let id: String = row.get("cast_member_id")?;
        let code: i32 = row.get("type")?;
        let created_at: String = row.get("created_at")?;

        let cast_member_type = CastMemberType::try_from(code)
            .map_err(|e| sql::conversion_error(e.to_string()))?;

        Ok(CastMember::restore(
            sql::parse_id(&id)?,
            row.get("name")?,
            cast_member_type,
            sql::parse_timestamp(&created_at)?,
        ))
    }

    fn insert_with(conn: &Connection, cast_member: &CastMember) -> AppResult<()> {
        conn.execute(
            "INSERT INTO cast_members (cast_member_id, name, type, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                cast_member.cast_member_id.to_string(),
                cast_member.name,
                cast_member.cast_member_type.code(),
                sql::format_timestamp(&cast_member.created_at),
            ],
        )?;
        Ok(())
    }
}

impl CastMemberRepository for SqliteCastMemberRepository {
    fn insert(&self, cast_member: &CastMember) -> AppResult<()> {
        self.uow
            .with_connection(|conn| Self::insert_with(conn, cast_member))
    }

    fn bulk_insert(&self, cast_members: &[CastMember]) -> AppResult<()> {
        self.uow.with_connection(|conn| {
            for cast_member in cast_members {
                Self::insert_with(conn, cast_member)?;
            }
            Ok(())
        })
    }

    fn update(&self, cast_member: &CastMember) -> AppResult<()> {
        let changed = self.uow.with_connection(|conn| {
            Ok(conn.execute(
                "UPDATE cast_members SET name = ?2, type = ?3 WHERE cast_member_id = ?1",
                params![
                    cast_member.cast_member_id.to_string(),
                    cast_member.name,
                    cast_member.cast_member_type.code(),
                ],
            )?)
        })?;

        if changed == 0 {
            return Err(AppError::not_found(cast_member.cast_member_id, "CastMember"));
        }
        Ok(())
    }

    fn delete(&self, id: &CastMemberId) -> AppResult<()> {
        let changed = self.uow.with_connection(|conn| {
            Ok(conn.execute(
                "DELETE FROM cast_members WHERE cast_member_id = ?1",
                [id.to_string()],
            )?)
        })?;

        if changed == 0 {
            return Err(AppError::not_found(id, "CastMember"));
        }
        Ok(())
    }

    fn find_by_id(&self, id: &CastMemberId) -> AppResult<Option<CastMember>> {
        self.uow.with_connection(|conn| {
            let mut stmt =
                conn.prepare(&format!("{SELECT_CAST_MEMBER} WHERE cast_member_id = ?1"))?;
            match stmt.query_row([id.to_string()], Self::row_to_cast_member) {
                Ok(cast_member) => Ok(Some(cast_member)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(AppError::Database(e)),
            }
        })
    }

    fn find_all(&self) -> AppResult<Vec<CastMember>> {
        self.uow.with_connection(|conn| {
            let mut stmt = conn.prepare(&format!("{SELECT_CAST_MEMBER} ORDER BY rowid ASC"))?;
            let cast_members = stmt
                .query_map([], Self::row_to_cast_member)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(cast_members)
        })
    }

    fn find_by_ids(&self, ids: &[CastMemberId]) -> AppResult<Vec<CastMember>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.uow.with_connection(|conn| {
            let mut stmt = conn.prepare(&format!(
                "{SELECT_CAST_MEMBER} WHERE cast_member_id IN ({}) ORDER BY rowid ASC",
                sql::placeholders(ids.len())
            ))?;
            let cast_members = stmt
                .query_map(
                    rusqlite::params_from_iter(ids.iter().map(|id| id.to_string())),
                    Self::row_to_cast_member,
                )?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(cast_members)
        })
    }

    fn exists_by_id(&self, ids: &[CastMemberId]) -> AppResult<ExistsResult<CastMemberId>> {
        self.uow.with_connection(|conn| {
            sql::exists_by_id(conn, "cast_members", "cast_member_id", ids)
        })
    }

    fn search(
        &self,
        params: &SearchParams<CastMemberFilter>,
    ) -> AppResult<SearchResult<CastMember>> {
        let mut filter = WhereClause::new();
        if let Some(cast_member_filter) = params.filter() {
            if let Some(name) = &cast_member_filter.name {
                filter.contains_ignore_case("name", name);
            }
            if let Some(kind) = cast_member_filter.cast_member_type {
                filter.equals("type", Value::Integer(i64::from(kind.code())));
            }
        }
        let order = sql::order_by::<CastMember>(params);
        debug!("Searching cast members{}{}", filter.sql(), order);

        let (items, total) = self.uow.with_connection(|conn| {
            sql::search_rows(
                conn,
                SELECT_CAST_MEMBER,
                "cast_members",
                &filter,
                &order,
                params,
                Self::row_to_cast_member,
            )
        })?;

        Ok(SearchResult::new(items, total, params.page(), params.per_page()))
    }
}
