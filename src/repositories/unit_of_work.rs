// src/repositories/unit_of_work.rs
//
// Transaction boundary around a sequence of repository calls, plus the set
// of aggregates touched inside it (their events are dispatched on success).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, warn};
use rusqlite::Connection;

use crate::db::{get_connection, ConnectionPool, PooledConn};
use crate::domain::{AggregateRoot, DomainError};
use crate::error::AppResult;
use crate::events::CatalogEvent;

/// Snapshot of an aggregate registered with a unit of work
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedAggregate {
    pub aggregate_id: String,
    pub events: Vec<CatalogEvent>,
}

impl TrackedAggregate {
    pub fn of(aggregate: &dyn AggregateRoot) -> Self {
        Self {
            aggregate_id: aggregate.aggregate_id(),
            events: aggregate.uncommitted_events(),
        }
    }
}

pub trait UnitOfWork: Send + Sync {
    fn start(&self) -> AppResult<()>;

    fn commit(&self) -> AppResult<()>;

    fn rollback(&self) -> AppResult<()>;

    /// Registering the same aggregate twice keeps the latest snapshot
    fn add_aggregate_root(&self, aggregate: &dyn AggregateRoot);

    fn aggregate_roots(&self) -> Vec<TrackedAggregate>;
}

impl dyn UnitOfWork {
    /// Run `work` inside the boundary: commit when it succeeds, roll back
    /// and return its error when it fails
    pub fn do_work<T, F>(&self, work: F) -> AppResult<T>
    where
        F: FnOnce() -> AppResult<T>,
    {
        self.start()?;
        match work() {
            Ok(value) => {
                self.commit()?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = self.rollback() {
                    warn!("Rollback failed after error '{}': {}", err, rollback_err);
                }
                Err(err)
            }
        }
    }
}

fn track(tracked: &Mutex<Vec<TrackedAggregate>>, aggregate: &dyn AggregateRoot) {
    let snapshot = TrackedAggregate::of(aggregate);
    let mut tracked = tracked.lock().unwrap_or_else(PoisonError::into_inner);
    match tracked
        .iter_mut()
        .find(|t| t.aggregate_id == snapshot.aggregate_id)
    {
        Some(existing) => *existing = snapshot,
        None => tracked.push(snapshot),
    }
}

// ============================================================================
// IN-MEMORY
// ============================================================================

/// Tracks aggregates and boundary calls without any storage behind it
#[derive(Debug, Default)]
pub struct InMemoryUnitOfWork {
    started: Mutex<bool>,
    tracked: Mutex<Vec<TrackedAggregate>>,
    commits: AtomicUsize,
    rollbacks: AtomicUsize,
}

impl InMemoryUnitOfWork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commits(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    pub fn rollbacks(&self) -> usize {
        self.rollbacks.load(Ordering::SeqCst)
    }

    fn finish(&self) -> AppResult<()> {
        let mut started = self.started.lock().unwrap_or_else(PoisonError::into_inner);
        if !*started {
            return Err(DomainError::InvalidStateTransition(
                "unit of work was not started".to_string(),
            )
            .into());
        }
        *started = false;
        self.tracked
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        Ok(())
    }
}

impl UnitOfWork for InMemoryUnitOfWork {
    fn start(&self) -> AppResult<()> {
        let mut started = self.started.lock().unwrap_or_else(PoisonError::into_inner);
        if *started {
            return Err(DomainError::InvalidStateTransition(
                "unit of work already started".to_string(),
            )
            .into());
        }
        *started = true;
        Ok(())
    }

    fn commit(&self) -> AppResult<()> {
        self.finish()?;
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn rollback(&self) -> AppResult<()> {
        self.finish()?;
        self.rollbacks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn add_aggregate_root(&self, aggregate: &dyn AggregateRoot) {
        track(&self.tracked, aggregate);
    }

    fn aggregate_roots(&self) -> Vec<TrackedAggregate> {
        self.tracked
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

// ============================================================================
// SQLITE
// ============================================================================

/// Holds one pooled connection with an open transaction between `start` and
/// `commit`/`rollback`. Repositories built on it run their statements on that
/// connection while a transaction is open, and on a fresh pooled connection
/// otherwise.
pub struct SqliteUnitOfWork {
    pool: Arc<ConnectionPool>,
    transaction: Mutex<Option<PooledConn>>,
    tracked: Mutex<Vec<TrackedAggregate>>,
}

impl SqliteUnitOfWork {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self {
            pool,
            transaction: Mutex::new(None),
            tracked: Mutex::new(Vec::new()),
        }
    }

    pub fn in_transaction(&self) -> bool {
        self.transaction
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Run `f` on the transaction's connection, or on a pooled one when no
    /// transaction is open
    pub fn with_connection<T, F>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&Connection) -> AppResult<T>,
    {
        let guard = self
            .transaction
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(conn) = guard.as_ref() {
            return f(conn);
        }
        drop(guard);

        let conn = get_connection(&self.pool)?;
        f(&conn)
    }

    fn finish(&self, statement: &str) -> AppResult<()> {
        let conn = self
            .transaction
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or_else(|| {
                DomainError::InvalidStateTransition("unit of work was not started".to_string())
            })?;
        self.tracked
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        conn.execute_batch(statement)?;
        debug!("Transaction finished with {}", statement);
        Ok(())
    }
}

impl UnitOfWork for SqliteUnitOfWork {
    fn start(&self) -> AppResult<()> {
        let mut transaction = self
            .transaction
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if transaction.is_some() {
            return Err(DomainError::InvalidStateTransition(
                "unit of work already started".to_string(),
            )
            .into());
        }

        let conn = get_connection(&self.pool)?;
        conn.execute_batch("BEGIN IMMEDIATE")?;
        *transaction = Some(conn);
        debug!("Transaction started");
        Ok(())
    }

    fn commit(&self) -> AppResult<()> {
        self.finish("COMMIT")
    }

    fn rollback(&self) -> AppResult<()> {
        self.finish("ROLLBACK")
    }

    fn add_aggregate_root(&self, aggregate: &dyn AggregateRoot) {
        track(&self.tracked, aggregate);
    }

    fn aggregate_roots(&self) -> Vec<TrackedAggregate> {
        self.tracked
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, initialize_database};
    use crate::domain::Category;
    use crate::error::AppError;

    fn sqlite_uow() -> SqliteUnitOfWork {
        let pool = create_test_pool().unwrap();
        initialize_database(&pool.get().unwrap()).unwrap();
        SqliteUnitOfWork::new(Arc::new(pool))
    }

    fn count_categories(uow: &SqliteUnitOfWork) -> i64 {
        uow.with_connection(|conn| {
            Ok(conn.query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?)
        })
        .unwrap()
    }

    fn insert_category(conn: &Connection) -> AppResult<()> {
        conn.execute(
            "INSERT INTO categories (category_id, name, is_active, created_at)
             VALUES ('c1', 'Movie', 1, '2024-01-01T00:00:00.000000000Z')",
            [],
        )?;
        Ok(())
    }

    #[test]
    fn test_do_work_commits_on_success() {
        let uow = sqlite_uow();
        let dyn_uow: &dyn UnitOfWork = &uow;

        dyn_uow
            .do_work(|| uow.with_connection(insert_category))
            .unwrap();

        assert!(!uow.in_transaction());
        assert_eq!(count_categories(&uow), 1);
    }

    #[test]
    fn test_do_work_rolls_back_on_failure() {
        let uow = sqlite_uow();
        let dyn_uow: &dyn UnitOfWork = &uow;

        let result: AppResult<()> = dyn_uow.do_work(|| {
            uow.with_connection(insert_category)?;
            Err(AppError::Other("boom".to_string()))
        });

        assert!(result.is_err());
        assert_eq!(count_categories(&uow), 0);
    }

    #[test]
    fn test_commit_without_start_fails() {
        let uow = sqlite_uow();
        assert!(matches!(
            uow.commit(),
            Err(AppError::Domain(DomainError::InvalidStateTransition(_)))
        ));
    }

    #[test]
    fn test_double_start_fails() {
        let uow = InMemoryUnitOfWork::new();
        uow.start().unwrap();
        assert!(uow.start().is_err());
        uow.rollback().unwrap();
        assert_eq!(uow.rollbacks(), 1);
    }

    #[test]
    fn test_tracking_dedupes_by_aggregate_id() {
        let uow = InMemoryUnitOfWork::new();
        let mut category = Category::fake().build();

        uow.start().unwrap();
        uow.add_aggregate_root(&category);
        category.change_name("Renamed");
        uow.add_aggregate_root(&category);

        assert_eq!(uow.aggregate_roots().len(), 1);

        uow.commit().unwrap();
        assert!(uow.aggregate_roots().is_empty());
        assert_eq!(uow.commits(), 1);
    }
}
