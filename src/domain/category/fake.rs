// Test data builder for Category

use chrono::{DateTime, Duration, Utc};

use super::entity::{Category, CategoryId};

pub struct CategoryFakeBuilder {
    category_id: Option<CategoryId>,
    name: String,
    description: Option<String>,
    is_active: bool,
    created_at: Option<DateTime<Utc>>,
}

impl Category {
    pub fn fake() -> CategoryFakeBuilder {
        CategoryFakeBuilder {
            category_id: None,
            name: "Movie".to_string(),
            description: Some("Movie description".to_string()),
            is_active: true,
            created_at: None,
        }
    }
}

impl CategoryFakeBuilder {
    pub fn with_id(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
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

    pub fn build(self) -> Category {
        Category::restore(
            self.category_id.unwrap_or_default(),
            self.name,
            self.description,
            self.is_active,
            self.created_at.unwrap_or_else(Utc::now),
        )
    }

    /// `count` categories named "{name} {i}", each one second newer than the last
    pub fn build_many(self, count: usize) -> Vec<Category> {
        let base = self.created_at.unwrap_or_else(Utc::now);
        (0..count)
            .map(|i| {
                Category::restore(
                    CategoryId::new(),
                    format!("{} {}", self.name, i),
                    self.description.clone(),
                    self.is_active,
                    base + Duration::seconds(i as i64),
                )
            })
            .collect()
    }
}
