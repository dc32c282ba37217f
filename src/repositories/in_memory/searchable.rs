// src/repositories/in_memory/searchable.rs
//
// Reference search engine: filter -> sort -> paginate over a snapshot of the
// stored aggregates. The SQLite repositories must return the same pages.

use std::sync::{PoisonError, RwLock};

use crate::domain::{AggregateRoot, Entity, EntityId, SearchParams, SearchResult, Searchable, SortDirection};
use crate::error::{AppError, AppResult};
use crate::repositories::ExistsResult;

/// Keep only items matching the filter. `None` skips filtering entirely.
pub fn apply_filter<E: Searchable>(items: Vec<E>, filter: Option<&E::Filter>) -> Vec<E> {
    match filter {
        None => items,
        Some(filter) => items.into_iter().filter(|item| item.matches(filter)).collect(),
    }
}

/// Stable sort by an allow-listed field. Unknown fields leave the order as is.
pub fn apply_sort<E: Searchable>(mut items: Vec<E>, sort: &str, direction: SortDirection) -> Vec<E> {
    if !E::SORTABLE_FIELDS.contains(&sort) {
        return items;
    }

    items.sort_by(|a, b| {
        let ordering = a.sort_value(sort).cmp(&b.sort_value(sort));
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    items
}

/// The requested page. A page past the end is empty.
pub fn apply_paginate<E>(items: Vec<E>, page: usize, per_page: usize) -> Vec<E> {
    let offset = page.saturating_sub(1).saturating_mul(per_page);
    items.into_iter().skip(offset).take(per_page).collect()
}

/// Full pipeline. Without an explicit sort the aggregate's default sort (if
/// any) applies.
pub fn search_items<E: Searchable>(items: Vec<E>, params: &SearchParams<E::Filter>) -> SearchResult<E> {
    let filtered = apply_filter(items, params.filter());
    let total = filtered.len();

    let sorted = match (params.sort(), params.sort_dir()) {
        (Some(sort), Some(direction)) => apply_sort(filtered, sort, direction),
        _ => match E::default_sort() {
            Some((sort, direction)) => apply_sort(filtered, sort, direction),
            None => filtered,
        },
    };

    let page = apply_paginate(sorted, params.page(), params.per_page());
    SearchResult::new(page, total, params.page(), params.per_page())
}

/// What a persisted row would hold: state without pending events
fn stored_copy<E: AggregateRoot + Clone>(entity: &E) -> E {
    let mut copy = entity.clone();
    copy.mark_events_dispatched();
    copy
}

/// Insertion-ordered store plus the search pipeline, shared by every
/// in-memory repository
#[derive(Debug)]
pub struct InMemorySearchable<E> {
    items: RwLock<Vec<E>>,
}

impl<E> Default for InMemorySearchable<E> {
    fn default() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
        }
    }
}

impl<E> InMemorySearchable<E>
where
    E: AggregateRoot + Entity + Searchable + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<E>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }

    /// Snapshot of everything stored, in insertion order
    pub fn items(&self) -> Vec<E> {
        self.items.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn insert(&self, entity: &E) -> AppResult<()> {
        self.items
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(stored_copy(entity));
        Ok(())
    }

    pub fn bulk_insert(&self, entities: &[E]) -> AppResult<()> {
        self.items
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(entities.iter().map(stored_copy));
        Ok(())
    }

    pub fn update(&self, entity: &E) -> AppResult<()> {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        let id = entity.id();
        let slot = items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or_else(|| not_found(&id))?;
        *slot = stored_copy(entity);
        Ok(())
    }

    pub fn delete(&self, id: &E::Id) -> AppResult<()> {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        let index = items
            .iter()
            .position(|item| item.id() == *id)
            .ok_or_else(|| not_found(id))?;
        items.remove(index);
        Ok(())
    }

    pub fn find_by_id(&self, id: &E::Id) -> AppResult<Option<E>> {
        Ok(self
            .items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|item| item.id() == *id)
            .cloned())
    }

    pub fn find_all(&self) -> AppResult<Vec<E>> {
        Ok(self.items())
    }

    pub fn find_by_ids(&self, ids: &[E::Id]) -> AppResult<Vec<E>> {
        Ok(self
            .items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|item| ids.contains(&item.id()))
            .cloned()
            .collect())
    }

    /// Split `ids` into stored and missing, keeping the order they were given
    pub fn exists_by_id(&self, ids: &[E::Id]) -> AppResult<ExistsResult<E::Id>> {
        let items = self.items.read().unwrap_or_else(PoisonError::into_inner);
        let mut result = ExistsResult::default();
        for id in ids {
            if items.iter().any(|item| item.id() == *id) {
                result.exists.push(*id);
            } else {
                result.not_exists.push(*id);
            }
        }
        Ok(result)
    }

    pub fn search(&self, params: &SearchParams<E::Filter>) -> AppResult<SearchResult<E>> {
        Ok(search_items(self.items(), params))
    }
}

fn not_found<I: EntityId>(id: &I) -> AppError {
    AppError::not_found(id, I::ENTITY)
}
