use validator::Validate;

use super::entity::Genre;
use crate::domain::shared::{validate_rules, Notification, ValidatorFields};

#[derive(Debug, Validate)]
struct GenreRules {
    #[validate(length(min = 1, max = 255))]
    name: String,
    #[validate(range(min = 1, message = "categories_id should not be empty"))]
    categories_id: usize,
}

/// Field rules for Genre. `categories_id` is only checked when requested.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenreValidator;

impl ValidatorFields<Genre> for GenreValidator {
    fn default_fields(&self) -> &'static [&'static str] {
        &["name"]
    }

    fn validate(&self, notification: &mut Notification, data: &Genre, fields: Option<&[&str]>) -> bool {
        let rules = GenreRules {
            name: data.name.clone(),
            categories_id: data.categories_id.len(),
        };
        validate_rules(notification, &rules, fields.unwrap_or(self.default_fields()))
    }
}

pub fn validate_genre(notification: &mut Notification, genre: &Genre, fields: Option<&[&str]>) -> bool {
    GenreValidator.validate(notification, genre, fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::CategoryId;
    use crate::domain::genre::{GenreCreateCommand, GenreFilter};
    use crate::domain::{AggregateRoot, Searchable};

    fn command(name: &str, categories: Vec<CategoryId>) -> GenreCreateCommand {
        GenreCreateCommand {
            name: name.to_string(),
            categories_id: categories,
            is_active: None,
        }
    }

    #[test]
    fn test_create_requires_a_category() {
        let err = Genre::create(command("Action", vec![])).unwrap_err();
        assert!(err.to_string().contains("Validation"));

        let genre = Genre::create(command("Action", vec![CategoryId::new()])).unwrap();
        assert_eq!(genre.categories_id.len(), 1);
        assert!(genre.is_active);
    }

    #[test]
    fn test_name_and_categories_errors_accumulate() {
        let mut genre = Genre::draft(command(&"x".repeat(256), vec![]));
        genre.validate(Some(&["categories_id"][..]));

        assert!(genre.notification().errors_for("name").is_some());
        assert_eq!(
            genre.notification().errors_for("categories_id").unwrap(),
            &["categories_id should not be empty".to_string()]
        );
    }

    #[test]
    fn test_sync_categories_is_full_replace() {
        let x = CategoryId::new();
        let y = CategoryId::new();
        let mut genre = Genre::create(command("Drama", vec![x])).unwrap();

        genre.sync_categories_id(vec![x]);
        genre.sync_categories_id(vec![y]);

        assert_eq!(genre.categories_id.to_vec(), vec![y]);
    }

    #[test]
    fn test_add_and_remove_category() {
        let x = CategoryId::new();
        let y = CategoryId::new();
        let mut genre = Genre::create(command("Drama", vec![x])).unwrap();

        genre.add_category_id(y);
        genre.add_category_id(y);
        assert_eq!(genre.categories_id.len(), 2);

        genre.remove_category_id(&x);
        assert!(!genre.categories_id.contains(&x));
        assert!(!genre.notification().has_errors());
    }

    #[test]
    fn test_change_name_records_errors() {
        let mut genre = Genre::create(command("Drama", vec![CategoryId::new()])).unwrap();
        genre.change_name("");
        assert!(genre.notification().errors_for("name").is_some());
    }

    #[test]
    fn test_filter_is_and_across_dimensions() {
        let x = CategoryId::new();
        let genre = Genre::create(command("Science Fiction", vec![x])).unwrap();

        let both = GenreFilter {
            name: Some("fiction".into()),
            categories_id: Some(vec![CategoryId::new(), x]),
        };
        assert!(genre.matches(&both));

        let wrong_category = GenreFilter {
            name: Some("fiction".into()),
            categories_id: Some(vec![CategoryId::new()]),
        };
        assert!(!genre.matches(&wrong_category));

        assert!(genre.matches(&GenreFilter::default()));
    }
}
