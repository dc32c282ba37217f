use chrono::{DateTime, Utc};
use serde::Serialize;

use super::invariants::validate_genre;
use crate::domain::category::CategoryId;
use crate::domain::shared::identifier::entity_id;
use crate::domain::shared::{
    contains_ignore_case, AggregateRoot, Entity, Notification, RelatedIds, Searchable,
    SortDirection, SortValue,
};
use crate::error::AppResult;

entity_id!(
    /// Identity of a Genre
    GenreId,
    "Genre"
);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Genre {
    pub genre_id: GenreId,
    pub name: String,
    pub categories_id: RelatedIds<CategoryId>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    notification: Notification,
}

#[derive(Debug, Clone, Default)]
pub struct GenreCreateCommand {
    pub name: String,
    pub categories_id: Vec<CategoryId>,
    pub is_active: Option<bool>,
}

/// Every present dimension must match
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenreFilter {
    pub name: Option<String>,
    pub categories_id: Option<Vec<CategoryId>>,
}

impl Genre {
    pub fn restore(
        genre_id: GenreId,
        name: String,
        categories_id: RelatedIds<CategoryId>,
        is_active: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            genre_id,
            name,
            categories_id,
            is_active,
            created_at,
            notification: Notification::new(),
        }
    }

    /// Build and validate the name; errors stay in the notification
    pub fn draft(command: GenreCreateCommand) -> Self {
        let mut genre = Self::restore(
            GenreId::new(),
            command.name,
            command.categories_id.into_iter().collect(),
            command.is_active.unwrap_or(true),
            Utc::now(),
        );
        genre.validate(None);
        genre
    }

    /// Build, validate name and category presence, fail on any error
    pub fn create(command: GenreCreateCommand) -> AppResult<Self> {
        let mut genre = Self::draft(command);
        genre.validate(Some(&["categories_id"][..]));
        genre.ensure_valid()?;
        Ok(genre)
    }

    pub fn change_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.validate(Some(&["name"][..]));
    }

    pub fn add_category_id(&mut self, category_id: CategoryId) {
        self.categories_id.add(category_id);
    }

    pub fn remove_category_id(&mut self, category_id: &CategoryId) {
        self.categories_id.remove(category_id);
    }

    pub fn sync_categories_id(&mut self, categories_id: Vec<CategoryId>) {
        self.categories_id.sync(categories_id);
    }

    pub fn activate(&mut self) {
        self.is_active = true;
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    pub fn validate(&mut self, fields: Option<&[&str]>) -> bool {
        let mut notification = std::mem::take(&mut self.notification);
        let valid = validate_genre(&mut notification, self, fields);
        self.notification = notification;
        valid
    }
}

impl Entity for Genre {
    type Id = GenreId;

    fn id(&self) -> GenreId {
        self.genre_id
    }
}

impl AggregateRoot for Genre {
    fn aggregate_id(&self) -> String {
        self.genre_id.to_string()
    }

    fn notification(&self) -> &Notification {
        &self.notification
    }

    fn notification_mut(&mut self) -> &mut Notification {
        &mut self.notification
    }
}

impl Searchable for Genre {
    type Filter = GenreFilter;

    const SORTABLE_FIELDS: &'static [&'static str] = &["name", "created_at"];

    fn sort_value(&self, field: &str) -> Option<SortValue> {
        match field {
            "name" => Some(SortValue::Text(self.name.clone())),
            "created_at" => Some(SortValue::Timestamp(self.created_at)),
            _ => None,
        }
    }

    fn matches(&self, filter: &GenreFilter) -> bool {
        let name_matches = filter
            .name
            .as_deref()
            .map_or(true, |name| contains_ignore_case(&self.name, name));
        let categories_match = filter
            .categories_id
            .as_deref()
            .map_or(true, |ids| self.categories_id.contains_any(ids));
        name_matches && categories_match
    }

    fn default_sort() -> Option<(&'static str, SortDirection)> {
        Some(("created_at", SortDirection::Desc))
    }
}
