// Test data builder for Genre

use chrono::{DateTime, Duration, Utc};

use super::entity::{Genre, GenreId};
use crate::domain::category::CategoryId;

pub struct GenreFakeBuilder {
    genre_id: Option<GenreId>,
    name: String,
    categories_id: Vec<CategoryId>,
    is_active: bool,
    created_at: Option<DateTime<Utc>>,
}

impl Genre {
    pub fn fake() -> GenreFakeBuilder {
        GenreFakeBuilder {
            genre_id: None,
            name: "Action".to_string(),
            categories_id: Vec::new(),
            is_active: true,
            created_at: None,
        }
    }
}

impl GenreFakeBuilder {
    pub fn with_id(mut self, genre_id: GenreId) -> Self {
        self.genre_id = Some(genre_id);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn add_category_id(mut self, category_id: CategoryId) -> Self {
        self.categories_id.push(category_id);
        self
    }

    pub fn deactivated(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// A genre always has a category; one synthetic id is used when none was given
    pub fn build(self) -> Genre {
        let categories_id = if self.categories_id.is_empty() {
            vec![CategoryId::new()]
        } else {
            self.categories_id
        };
        Genre::restore(
            self.genre_id.unwrap_or_default(),
            self.name,
            categories_id.into_iter().collect(),
            self.is_active,
            self.created_at.unwrap_or_else(Utc::now),
        )
    }

    pub fn build_many(self, count: usize) -> Vec<Genre> {
        let base = self.created_at.unwrap_or_else(Utc::now);
        (0..count)
            .map(|i| {
                Genre::fake()
                    .with_name(format!("{} {}", self.name, i))
                    .with_created_at(base + Duration::seconds(i as i64))
                    .build()
            })
            .collect()
    }
}
