use chrono::{DateTime, Utc};
use serde::Serialize;

use super::invariants::validate_category;
use crate::domain::shared::identifier::entity_id;
use crate::domain::shared::{
    contains_ignore_case, AggregateRoot, Entity, Notification, Searchable, SortDirection,
    SortValue,
};
use crate::error::AppResult;

entity_id!(
    /// Identity of a Category
    CategoryId,
    "Category"
);

/// A classification videos and genres are filed under
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub category_id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    notification: Notification,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryCreateCommand {
    pub name: String,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

/// Category filter is a plain name fragment
pub type CategoryFilter = String;

impl Category {
    /// Rehydrate from stored state, no validation
    pub fn restore(
        category_id: CategoryId,
        name: String,
        description: Option<String>,
        is_active: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            category_id,
            name,
            description,
            is_active,
            created_at,
            notification: Notification::new(),
        }
    }

    /// Build and validate; errors stay in the notification
    pub fn draft(command: CategoryCreateCommand) -> Self {
        let mut category = Self::restore(
            CategoryId::new(),
            command.name,
            command.description,
            command.is_active.unwrap_or(true),
            Utc::now(),
        );
        category.validate(None);
        category
    }

    /// Build, validate and fail with every accumulated error
    pub fn create(command: CategoryCreateCommand) -> AppResult<Self> {
        let category = Self::draft(command);
        category.ensure_valid()?;
        Ok(category)
    }

    pub fn change_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.validate(Some(&["name"][..]));
    }

    pub fn change_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    pub fn activate(&mut self) {
        self.is_active = true;
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    pub fn validate(&mut self, fields: Option<&[&str]>) -> bool {
        let mut notification = std::mem::take(&mut self.notification);
        let valid = validate_category(&mut notification, self, fields);
        self.notification = notification;
        valid
    }
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> CategoryId {
        self.category_id
    }
}

impl AggregateRoot for Category {
    fn aggregate_id(&self) -> String {
        self.category_id.to_string()
    }

    fn notification(&self) -> &Notification {
        &self.notification
    }

    fn notification_mut(&mut self) -> &mut Notification {
        &mut self.notification
    }
}

impl Searchable for Category {
    type Filter = CategoryFilter;

    const SORTABLE_FIELDS: &'static [&'static str] = &["name", "created_at"];

    fn sort_value(&self, field: &str) -> Option<SortValue> {
        match field {
            "name" => Some(SortValue::Text(self.name.clone())),
            "created_at" => Some(SortValue::Timestamp(self.created_at)),
            _ => None,
        }
    }

    fn matches(&self, filter: &CategoryFilter) -> bool {
        contains_ignore_case(&self.name, filter)
    }

    /// Categories pass through unsorted unless a sort is requested
    fn default_sort() -> Option<(&'static str, SortDirection)> {
        None
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
