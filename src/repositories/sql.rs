// src/repositories/sql.rs
//
// SQL building blocks shared by the SQLite repositories. Search queries are
// built so their pages match the in-memory engine: same filter semantics,
// allow-listed sort columns, and insertion order (rowid) to break ties.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::{Type, Value};
use rusqlite::{params_from_iter, Connection, Row};

use crate::domain::{EntityId, RelatedIds, SearchParams, Searchable};
use crate::error::AppResult;
use crate::repositories::ExistsResult;

// ============================================================================
// CONVERSIONS
// ============================================================================

/// Fixed-width UTC timestamp, so text order is chronological order
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub fn parse_timestamp(raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(format!("Invalid timestamp '{}': {}", raw, e)))
}

pub fn parse_id<I: EntityId>(raw: &str) -> rusqlite::Result<I> {
    I::parse_str(raw).map_err(|e| conversion_error(e.to_string()))
}

/// Row mapping failure carrying a readable reason
pub fn conversion_error(message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        0,
        Type::Text,
        Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, message)),
    )
}

/// The statement broke a FOREIGN KEY constraint (a RESTRICT reference)
pub fn is_foreign_key_violation(error: &rusqlite::Error) -> bool {
    matches!(
        error,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
    )
}

/// `?, ?, ?` for `count` positional parameters
pub fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

// ============================================================================
// SEARCH
// ============================================================================

/// AND-ed WHERE conditions with their positional parameters
#[derive(Debug, Default)]
pub struct WhereClause {
    conditions: Vec<String>,
    params: Vec<Value>,
}

impl WhereClause {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive substring match, folded by the connection's
    /// `fold_case` function
    pub fn contains_ignore_case(&mut self, column: &str, needle: &str) {
        self.conditions
            .push(format!("instr(fold_case({column}), fold_case(?)) > 0"));
        self.params.push(Value::Text(needle.to_string()));
    }

    pub fn equals(&mut self, column: &str, value: Value) {
        self.conditions.push(format!("{column} = ?"));
        self.params.push(value);
    }

    /// The owner row is related to at least one of `ids` through `table`.
    /// An empty list matches nothing.
    pub fn related_to_any<I: EntityId>(
        &mut self,
        table: &str,
        owner_column: &str,
        owner_ref: &str,
        related_column: &str,
        ids: &[I],
    ) {
        if ids.is_empty() {
            self.conditions.push("0".to_string());
            return;
        }
        self.conditions.push(format!(
            "EXISTS (SELECT 1 FROM {table} r WHERE r.{owner_column} = {owner_ref} AND r.{related_column} IN ({}))",
            placeholders(ids.len())
        ));
        self.params
            .extend(ids.iter().map(|id| Value::Text(id.to_string())));
    }

    pub fn sql(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }
}

/// ORDER BY for a search: an allow-listed explicit field, else the
/// aggregate's default, else insertion order. Ties always fall back to
/// insertion order, like the stable in-memory sort.
pub fn order_by<E: Searchable>(params: &SearchParams<E::Filter>) -> String {
    let chosen = match params.sort() {
        Some(sort) => E::SORTABLE_FIELDS
            .iter()
            .find(|field| **field == sort)
            .map(|field| (*field, params.sort_dir().unwrap_or_default())),
        None => E::default_sort(),
    };

    match chosen {
        Some((field, direction)) => format!(" ORDER BY {} {}, rowid ASC", field, direction.as_sql()),
        None => " ORDER BY rowid ASC".to_string(),
    }
}

/// Run a paged search. Returns the page rows and the filtered total. A page
/// whose offset does not fit SQLite's integers is past the end, so it is
/// empty without querying.
pub fn search_rows<T, P, F>(
    conn: &Connection,
    select: &str,
    table: &str,
    filter: &WhereClause,
    order: &str,
    params: &SearchParams<P>,
    map_row: F,
) -> AppResult<(Vec<T>, usize)>
where
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    let where_sql = filter.sql();

    let total: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM {table}{where_sql}"),
        params_from_iter(filter.params().iter()),
        |row| row.get(0),
    )?;

    let (Ok(limit), Ok(offset)) = (
        i64::try_from(params.per_page()),
        i64::try_from(params.offset()),
    ) else {
        return Ok((Vec::new(), total as usize));
    };

    let mut values = filter.params().to_vec();
    values.push(Value::Integer(limit));
    values.push(Value::Integer(offset));

    let mut stmt = conn.prepare(&format!("{select}{where_sql}{order} LIMIT ? OFFSET ?"))?;
    let rows = stmt
        .query_map(params_from_iter(values.iter()), map_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok((rows, total as usize))
}

// ============================================================================
// IDS & RELATIONS
// ============================================================================

/// Split `ids` into stored and missing with one query, keeping input order
pub fn exists_by_id<I: EntityId>(
    conn: &Connection,
    table: &str,
    id_column: &str,
    ids: &[I],
) -> AppResult<ExistsResult<I>> {
    if ids.is_empty() {
        return Ok(ExistsResult::default());
    }

    let mut stmt = conn.prepare(&format!(
        "SELECT {id_column} FROM {table} WHERE {id_column} IN ({})",
        placeholders(ids.len())
    ))?;
    let found = stmt
        .query_map(params_from_iter(ids.iter().map(|id| id.to_string())), |row| {
            row.get::<_, String>(0)
        })?
        .collect::<Result<std::collections::HashSet<_>, _>>()?;

    let mut result = ExistsResult::default();
    for id in ids {
        if found.contains(&id.to_string()) {
            result.exists.push(*id);
        } else {
            result.not_exists.push(*id);
        }
    }
    Ok(result)
}

pub fn load_related<I: EntityId>(
    conn: &Connection,
    table: &str,
    owner_column: &str,
    owner_id: &str,
    related_column: &str,
) -> AppResult<RelatedIds<I>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {related_column} FROM {table} WHERE {owner_column} = ?1"
    ))?;
    let ids = stmt
        .query_map([owner_id], |row| {
            let raw: String = row.get(0)?;
            parse_id::<I>(&raw)
        })?
        .collect::<Result<RelatedIds<I>, _>>()?;
    Ok(ids)
}

/// Full replace of one owner's relation rows
pub fn replace_related<I: EntityId>(
    conn: &Connection,
    table: &str,
    owner_column: &str,
    owner_id: &str,
    related_column: &str,
    related: &RelatedIds<I>,
) -> AppResult<()> {
    conn.execute(
        &format!("DELETE FROM {table} WHERE {owner_column} = ?1"),
        [owner_id],
    )?;
    let mut stmt = conn.prepare(&format!(
        "INSERT INTO {table} ({owner_column}, {related_column}) VALUES (?1, ?2)"
    ))?;
    for id in related.iter() {
        stmt.execute([owner_id, id.to_string().as_str()])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, CategoryFilter, CategoryId, Genre, GenreFilter, SortDirection};
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_round_trip_is_exact_and_fixed_width() {
        let a = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let b = a + chrono::Duration::nanoseconds(1_500);
        let (fa, fb) = (format_timestamp(&a), format_timestamp(&b));

        assert_eq!(fa.len(), fb.len());
        assert!(fa < fb);
        assert_eq!(parse_timestamp(&fb).unwrap(), b);
    }

    #[test]
    fn test_order_by_rules() {
        let explicit: SearchParams<CategoryFilter> =
            SearchParams::new().with_sort("name").with_sort_dir(SortDirection::Desc);
        assert_eq!(order_by::<Category>(&explicit), " ORDER BY name DESC, rowid ASC");

        let unknown: SearchParams<CategoryFilter> = SearchParams::new().with_sort("secret");
        assert_eq!(order_by::<Category>(&unknown), " ORDER BY rowid ASC");

        let none: SearchParams<CategoryFilter> = SearchParams::new();
        assert_eq!(order_by::<Category>(&none), " ORDER BY rowid ASC");

        let genre_default: SearchParams<GenreFilter> = SearchParams::new();
        assert_eq!(
            order_by::<Genre>(&genre_default),
            " ORDER BY created_at DESC, rowid ASC"
        );

        let unknown_genre: SearchParams<GenreFilter> = SearchParams::new().with_sort("secret");
        assert_eq!(order_by::<Genre>(&unknown_genre), " ORDER BY rowid ASC");
    }

    #[test]
    fn test_where_clause_building() {
        let mut clause = WhereClause::new();
        assert_eq!(clause.sql(), "");

        clause.contains_ignore_case("name", "Act");
        clause.related_to_any::<CategoryId>("genre_categories", "genre_id", "genres.genre_id", "category_id", &[]);
        assert_eq!(
            clause.sql(),
            " WHERE instr(fold_case(name), fold_case(?)) > 0 AND 0"
        );
        assert_eq!(clause.params().len(), 1);
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(placeholders(3), "?, ?, ?");
    }
}
