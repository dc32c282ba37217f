// src/domain/shared/related_ids.rs
//
// Relationship set held by an aggregate (genre -> categories, video ->
// categories/genres/cast members). Keyed by the id's canonical string so
// duplicates collapse and equality ignores insertion order.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use super::identifier::EntityId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedIds<I: EntityId> {
    ids: BTreeMap<String, I>,
}

impl<I: EntityId> Default for RelatedIds<I> {
    fn default() -> Self {
        Self {
            ids: BTreeMap::new(),
        }
    }
}

impl<I: EntityId> RelatedIds<I> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent: adding an id twice keeps one entry
    pub fn add(&mut self, id: I) {
        self.ids.insert(id.to_string(), id);
    }

    pub fn remove(&mut self, id: &I) -> bool {
        self.ids.remove(&id.to_string()).is_some()
    }

    /// Full replace: ids missing from `ids` are dropped
    pub fn sync<T: IntoIterator<Item = I>>(&mut self, ids: T) {
        *self = ids.into_iter().collect();
    }

    pub fn contains(&self, id: &I) -> bool {
        self.ids.contains_key(&id.to_string())
    }

    /// True when at least one of `ids` is in the set
    pub fn contains_any(&self, ids: &[I]) -> bool {
        ids.iter().any(|id| self.contains(id))
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &I> {
        self.ids.values()
    }

    pub fn to_vec(&self) -> Vec<I> {
        self.ids.values().copied().collect()
    }

    pub fn to_strings(&self) -> Vec<String> {
        self.ids.keys().cloned().collect()
    }
}

impl<I: EntityId> FromIterator<I> for RelatedIds<I> {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        let mut related = Self::new();
        for id in iter {
            related.add(id);
        }
        related
    }
}

impl<I: EntityId> Serialize for RelatedIds<I> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.ids.keys())
    }
}
